use std::path::Path;

use bls12_381::{G1Point, G2Point};

use crate::{
    constants::{BYTES_PER_G1_POINT, BYTES_PER_G2_POINT, NUM_G1_POINTS, NUM_G2_POINTS},
    errors::TrustedSetupError,
    Error,
};

/// The structured reference string from the KZG ceremony: powers of the
/// secret `tau` in both groups.
///
/// Only the monomial bases are kept. The ceremony file also carries the
/// G1 points in Lagrange form, but those are re-derived from the monomial
/// points during settings construction rather than trusted from the file.
#[derive(Debug, PartialEq, Eq)]
pub struct TrustedSetup {
    /// `[tau^i] G1` for `i` in `0..4096`.
    pub g1_monomial: Vec<G1Point>,
    /// `[tau^i] G2` for `i` in `0..=64`.
    pub g2_monomial: Vec<G2Point>,
}

impl TrustedSetup {
    /// Parses the ceremony text format.
    ///
    /// The file is a whitespace-separated token stream: the G1 count
    /// (4096), the G2 count (65), then 4096 hex-encoded compressed G1
    /// points in monomial basis, 4096 in Lagrange basis, and 65 compressed
    /// G2 points. Every point must decompress onto the curve and pass the
    /// subgroup check; the Lagrange block is validated and then dropped.
    pub fn from_str(contents: &str) -> Result<Self, Error> {
        let mut tokens = contents.split_whitespace();

        let num_g1 = parse_count(tokens.next(), "number of G1 points")?;
        if num_g1 != NUM_G1_POINTS {
            return Err(TrustedSetupError::UnexpectedNumberOfG1Points { got: num_g1 }.into());
        }

        let num_g2 = parse_count(tokens.next(), "number of G2 points")?;
        if num_g2 != NUM_G2_POINTS {
            return Err(TrustedSetupError::UnexpectedNumberOfG2Points { got: num_g2 }.into());
        }

        let g1_monomial = parse_g1_section(&mut tokens, num_g1, "G1 monomial point")?;

        // The Lagrange block is checked for well-formedness but the values
        // themselves are recomputed from the monomial basis later.
        let _g1_lagrange = parse_g1_section(&mut tokens, num_g1, "G1 lagrange point")?;

        let mut g2_monomial = Vec::with_capacity(num_g2);
        for index in 0..num_g2 {
            let token = tokens
                .next()
                .ok_or(TrustedSetupError::MissingToken {
                    expected: "G2 monomial point",
                })?;
            g2_monomial.push(parse_g2_point(token, index)?);
        }

        let leftover = tokens.count();
        if leftover != 0 {
            return Err(TrustedSetupError::TrailingData {
                num_tokens: leftover,
            }
            .into());
        }

        Ok(Self {
            g1_monomial,
            g2_monomial,
        })
    }

    /// Reads and parses a ceremony file from disk.
    ///
    /// This is the library's only I/O path, and it runs once at startup.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)
            .map_err(TrustedSetupError::Io)
            .map_err(Error::from)?;
        Self::from_str(&contents)
    }
}

fn parse_count(token: Option<&str>, expected: &'static str) -> Result<usize, Error> {
    let token = token.ok_or(TrustedSetupError::MissingToken { expected })?;
    token
        .parse::<usize>()
        .map_err(|_| {
            TrustedSetupError::InvalidCount {
                token: token.to_string(),
            }
            .into()
        })
}

fn parse_g1_section<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    count: usize,
    expected: &'static str,
) -> Result<Vec<G1Point>, Error> {
    let mut points = Vec::with_capacity(count);
    for index in 0..count {
        let token = tokens
            .next()
            .ok_or(TrustedSetupError::MissingToken { expected })?;
        points.push(parse_g1_point(token, index)?);
    }
    Ok(points)
}

fn parse_g1_point(token: &str, index: usize) -> Result<G1Point, Error> {
    let mut bytes = [0u8; BYTES_PER_G1_POINT];
    hex::decode_to_slice(token, &mut bytes)
        .map_err(|_| TrustedSetupError::InvalidHexEncoding { index })?;

    // Decompression runs the on-curve and subgroup checks.
    let point: Option<G1Point> = Option::from(G1Point::from_compressed(&bytes));
    point
        .ok_or_else(|| TrustedSetupError::InvalidGroupElement { index }.into())
}

fn parse_g2_point(token: &str, index: usize) -> Result<G2Point, Error> {
    let mut bytes = [0u8; BYTES_PER_G2_POINT];
    hex::decode_to_slice(token, &mut bytes)
        .map_err(|_| TrustedSetupError::InvalidHexEncoding { index })?;

    let point: Option<G2Point> = Option::from(G2Point::from_compressed(&bytes));
    point
        .ok_or_else(|| TrustedSetupError::InvalidGroupElement { index }.into())
}

#[cfg(test)]
mod tests {
    use bls12_381::{
        g1_batch_normalize, g2_batch_normalize, traits::*, G1Projective, G2Projective, Scalar,
    };

    use super::*;
    use crate::errors::TrustedSetupError;

    /// A full ceremony-format file over a tiny known secret.
    ///
    /// Building a real 4096-point file as a string is slow but it is the
    /// only way to exercise the parser end to end.
    fn ceremony_file_for_secret(secret: Scalar) -> String {
        let mut g1 = Vec::with_capacity(NUM_G1_POINTS);
        let mut power = Scalar::ONE;
        for _ in 0..NUM_G1_POINTS {
            g1.push(G1Projective::generator() * power);
            power *= secret;
        }
        let g1 = g1_batch_normalize(&g1);

        let mut g2 = Vec::with_capacity(NUM_G2_POINTS);
        let mut power = Scalar::ONE;
        for _ in 0..NUM_G2_POINTS {
            g2.push(G2Projective::generator() * power);
            power *= secret;
        }
        let g2 = g2_batch_normalize(&g2);

        let mut out = String::new();
        out.push_str(&format!("{NUM_G1_POINTS}\n{NUM_G2_POINTS}\n"));
        for point in &g1 {
            out.push_str(&hex::encode(point.to_compressed()));
            out.push('\n');
        }
        // The Lagrange section is validated but discarded; reusing the
        // monomial points keeps the fixture simple.
        for point in &g1 {
            out.push_str(&hex::encode(point.to_compressed()));
            out.push('\n');
        }
        for point in &g2 {
            out.push_str(&hex::encode(point.to_compressed()));
            out.push('\n');
        }
        out
    }

    #[test]
    fn parses_a_well_formed_file() {
        let contents = ceremony_file_for_secret(Scalar::from(7u64));
        let setup = TrustedSetup::from_str(&contents).expect("well-formed file");

        assert_eq!(setup.g1_monomial.len(), NUM_G1_POINTS);
        assert_eq!(setup.g2_monomial.len(), NUM_G2_POINTS);
        assert_eq!(setup.g1_monomial[0], G1Point::generator());
        assert_eq!(
            setup.g1_monomial[1],
            (G1Projective::generator() * Scalar::from(7u64)).into()
        );
    }

    #[test]
    fn wrong_counts_are_rejected() {
        let err = TrustedSetup::from_str("1234\n65\n").unwrap_err();
        assert!(matches!(
            err,
            Error::TrustedSetup(TrustedSetupError::UnexpectedNumberOfG1Points { got: 1234 })
        ));

        let err = TrustedSetup::from_str("4096\n64\n").unwrap_err();
        assert!(matches!(
            err,
            Error::TrustedSetup(TrustedSetupError::UnexpectedNumberOfG2Points { got: 64 })
        ));
    }

    #[test]
    fn truncated_file_is_rejected() {
        let err = TrustedSetup::from_str("4096\n65\nabcdef\n").unwrap_err();
        // One short hex token, then the stream runs dry.
        assert!(matches!(err, Error::TrustedSetup(_)));
    }

    #[test]
    fn garbage_counts_are_rejected() {
        let err = TrustedSetup::from_str("x\n65\n").unwrap_err();
        assert!(matches!(
            err,
            Error::TrustedSetup(TrustedSetupError::InvalidCount { .. })
        ));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let mut contents = ceremony_file_for_secret(Scalar::from(5u64));
        contents.push_str("deadbeef\n");
        let err = TrustedSetup::from_str(&contents).unwrap_err();
        assert!(matches!(
            err,
            Error::TrustedSetup(TrustedSetupError::TrailingData { num_tokens: 1 })
        ));
    }
}
