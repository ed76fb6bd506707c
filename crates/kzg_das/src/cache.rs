//! Binary cache of a fully constructed [`KzgSettings`].
//!
//! Loading the trusted setup pays for a G1 IFFT and the FK20 column FFTs;
//! serializing the finished settings lets later processes skip that work.
//! The format is fixed little-endian-canonical, so a cache written on one
//! machine loads on any other; the endianness and word-size header bytes
//! are kept from the original scheme and validated so that caches written
//! by platform-specific writers are rejected rather than misread.
//!
//! The cache is produced by this library from an already validated setup,
//! so points are stored uncompressed and reloaded without curve or
//! subgroup checks.

use bls12_381::{fixed_base_msm::UsePrecomp, G1Point, G2Point, Scalar};

use crate::{
    constants::{
        CELLS_PER_EXT_BLOB, FIELD_ELEMENTS_PER_CELL, FIELD_ELEMENTS_PER_EXT_BLOB, NUM_G1_POINTS,
        NUM_G2_POINTS,
    },
    errors::CacheError,
    settings::KzgSettings,
    Error,
};

const MAGIC: [u8; 4] = *b"KZG\0";
const FORMAT_VERSION: u8 = 1;

/// Marker for little-endian data; the only value this build writes or
/// accepts.
const ENDIANNESS_LITTLE: u8 = 2;

/// Marker for 64-bit words; the only value this build writes or accepts.
const WORD_SIZE_64: u8 = 8;

const HEADER_SIZE: usize = 7;
const BYTES_PER_SCALAR: usize = 32;
const BYTES_PER_G1_UNCOMPRESSED: usize = 96;
const BYTES_PER_G2_UNCOMPRESSED: usize = 192;

const ROOTS_LEN: usize = FIELD_ELEMENTS_PER_EXT_BLOB + 1;
const BRP_ROOTS_LEN: usize = FIELD_ELEMENTS_PER_EXT_BLOB;

const fn serialized_size() -> usize {
    HEADER_SIZE
        + size_of::<u64>() // wbits
        + (ROOTS_LEN + BRP_ROOTS_LEN + ROOTS_LEN) * BYTES_PER_SCALAR
        + NUM_G1_POINTS * BYTES_PER_G1_UNCOMPRESSED // monomial
        + NUM_G1_POINTS * BYTES_PER_G1_UNCOMPRESSED // lagrange, brp order
        + NUM_G2_POINTS * BYTES_PER_G2_UNCOMPRESSED
        + CELLS_PER_EXT_BLOB * FIELD_ELEMENTS_PER_CELL * BYTES_PER_G1_UNCOMPRESSED
}

impl KzgSettings {
    /// Serializes every precomputed array of the settings.
    ///
    /// The fixed-base window tables are not written; they are a pure
    /// function of the stored columns and `wbits` and are rebuilt on
    /// load.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(serialized_size());

        out.extend(MAGIC);
        out.push(FORMAT_VERSION);
        out.push(ENDIANNESS_LITTLE);
        out.push(WORD_SIZE_64);

        out.extend((self.wbits as u64).to_le_bytes());

        for root in &self.roots_of_unity {
            out.extend(root.to_bytes_le());
        }
        for root in &self.brp_roots_of_unity {
            out.extend(root.to_bytes_le());
        }
        for root in &self.reverse_roots_of_unity {
            out.extend(root.to_bytes_le());
        }

        for point in &self.g1_values_monomial {
            out.extend(point.to_uncompressed());
        }
        for point in &self.g1_values_lagrange_brp {
            out.extend(point.to_uncompressed());
        }
        for point in &self.g2_values_monomial {
            out.extend(point.to_uncompressed());
        }

        for column in &self.x_ext_fft_columns {
            for point in column {
                out.extend(point.to_uncompressed());
            }
        }

        debug_assert_eq!(out.len(), serialized_size());
        out
    }

    /// Rebuilds settings from a serialized cache.
    ///
    /// The header must match this build's format exactly. The stored
    /// roots are checked against the derived ones; the G1/G2 arrays and
    /// FK20 columns are taken as-is and the remaining engine state
    /// (domains, window tables) is reconstructed around them.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(bytes);

        let magic = reader.take(4)?;
        if magic != MAGIC {
            return Err(CacheError::InvalidMagic.into());
        }
        let version = reader.byte()?;
        if version != FORMAT_VERSION {
            return Err(CacheError::UnsupportedVersion { got: version }.into());
        }
        let endianness = reader.byte()?;
        if endianness != ENDIANNESS_LITTLE {
            return Err(CacheError::EndiannessMismatch { got: endianness }.into());
        }
        let wordsize = reader.byte()?;
        if wordsize != WORD_SIZE_64 {
            return Err(CacheError::WordSizeMismatch { got: wordsize }.into());
        }

        let wbits = reader.u64()? as usize;

        let roots_of_unity = reader.scalars(ROOTS_LEN)?;
        let brp_roots_of_unity = reader.scalars(BRP_ROOTS_LEN)?;
        let reverse_roots_of_unity = reader.scalars(ROOTS_LEN)?;

        let g1_values_monomial = reader.g1_points(NUM_G1_POINTS)?;
        let g1_values_lagrange_brp = reader.g1_points(NUM_G1_POINTS)?;
        let g2_values_monomial = reader.g2_points(NUM_G2_POINTS)?;

        let mut x_ext_fft_columns = Vec::with_capacity(CELLS_PER_EXT_BLOB);
        for _ in 0..CELLS_PER_EXT_BLOB {
            x_ext_fft_columns.push(reader.g1_points(FIELD_ELEMENTS_PER_CELL)?);
        }

        reader.finish()?;

        let settings = Self::build(
            g1_values_monomial,
            Some(g1_values_lagrange_brp),
            g2_values_monomial,
            Some(x_ext_fft_columns),
            UsePrecomp::from_width(wbits),
        )?;

        // The roots are derived, not trusted; a mismatch means the cache
        // was written for a different domain (or corrupted).
        let roots_consistent = settings.roots_of_unity == roots_of_unity
            && settings.brp_roots_of_unity == brp_roots_of_unity
            && settings.reverse_roots_of_unity == reverse_roots_of_unity;
        if !roots_consistent {
            return Err(CacheError::RootsMismatch.into());
        }

        Ok(settings)
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, num_bytes: usize) -> Result<&'a [u8], CacheError> {
        let end = self
            .offset
            .checked_add(num_bytes)
            .ok_or(CacheError::UnexpectedEndOfData)?;
        if end > self.bytes.len() {
            return Err(CacheError::UnexpectedEndOfData);
        }
        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn byte(&mut self) -> Result<u8, CacheError> {
        Ok(self.take(1)?[0])
    }

    fn u64(&mut self) -> Result<u64, CacheError> {
        let bytes = self.take(size_of::<u64>())?;
        Ok(u64::from_le_bytes(
            bytes.try_into().expect("take returned 8 bytes"),
        ))
    }

    fn scalars(&mut self, count: usize) -> Result<Vec<Scalar>, CacheError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let bytes: &[u8; BYTES_PER_SCALAR] = self
                .take(BYTES_PER_SCALAR)?
                .try_into()
                .expect("take returned 32 bytes");
            let scalar: Option<Scalar> = Scalar::from_bytes_le(bytes).into();
            out.push(scalar.ok_or(CacheError::InvalidFieldElement)?);
        }
        Ok(out)
    }

    fn g1_points(&mut self, count: usize) -> Result<Vec<G1Point>, CacheError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let bytes: &[u8; BYTES_PER_G1_UNCOMPRESSED] = self
                .take(BYTES_PER_G1_UNCOMPRESSED)?
                .try_into()
                .expect("take returned 96 bytes");
            // No curve or subgroup check; the cache carries points this
            // library already validated when the setup was first loaded.
            let point: Option<G1Point> = Option::from(G1Point::from_uncompressed_unchecked(bytes));
            out.push(point.ok_or(CacheError::InvalidGroupElement)?);
        }
        Ok(out)
    }

    fn g2_points(&mut self, count: usize) -> Result<Vec<G2Point>, CacheError> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let bytes: &[u8; BYTES_PER_G2_UNCOMPRESSED] = self
                .take(BYTES_PER_G2_UNCOMPRESSED)?
                .try_into()
                .expect("take returned 192 bytes");
            let point: Option<G2Point> = Option::from(G2Point::from_uncompressed_unchecked(bytes));
            out.push(point.ok_or(CacheError::InvalidGroupElement)?);
        }
        Ok(out)
    }

    fn finish(&self) -> Result<(), CacheError> {
        let leftover = self.bytes.len() - self.offset;
        if leftover != 0 {
            return Err(CacheError::TrailingData {
                num_bytes: leftover,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CacheError;

    #[test]
    fn rejects_wrong_magic() {
        let err = KzgSettings::from_bytes(b"NOPE").unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::InvalidMagic)));
    }

    #[test]
    fn rejects_truncated_header() {
        let err = KzgSettings::from_bytes(b"KZ").unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::UnexpectedEndOfData)));
    }

    #[test]
    fn rejects_foreign_platform_markers() {
        // Version bump.
        let err = KzgSettings::from_bytes(&[b'K', b'Z', b'G', 0, 2, 2, 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::Cache(CacheError::UnsupportedVersion { got: 2 })
        ));

        // Big-endian writer.
        let err = KzgSettings::from_bytes(&[b'K', b'Z', b'G', 0, 1, 1, 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::Cache(CacheError::EndiannessMismatch { got: 1 })
        ));

        // 32-bit writer.
        let err = KzgSettings::from_bytes(&[b'K', b'Z', b'G', 0, 1, 2, 4]).unwrap_err();
        assert!(matches!(
            err,
            Error::Cache(CacheError::WordSizeMismatch { got: 4 })
        ));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut bytes = vec![b'K', b'Z', b'G', 0, 1, 2, 8];
        bytes.extend(0u64.to_le_bytes());
        bytes.extend([0u8; 31]); // one byte short of a scalar
        let err = KzgSettings::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, Error::Cache(CacheError::UnexpectedEndOfData)));
    }
}
