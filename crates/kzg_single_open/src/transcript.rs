use bls12_381::{ff::Field, reduce_bytes_to_scalar, Scalar};
use sha2::{Digest, Sha256};
use std::iter::successors;

/// Domain separator for the single-blob evaluation challenge.
const DOMAIN_SEP_BLOB: &str = "FSBLOBVERIFY_V1_";

/// Domain separator for the blob-batch verification challenge.
const DOMAIN_SEP_BATCH: &str = "RCKZGBATCH___V1_";

/// Fiat-Shamir challenge binding a blob to its commitment.
///
/// Hash input: tag, polynomial degree (8 bytes little-endian), the
/// commitment, then the raw blob bytes. The digest is reduced mod r.
///
/// The reduction only yields ~128 uniform bits, which is all a batching
/// challenge needs; see the randomizers discussion in
/// <https://cr.yp.to/badbatch/badbatch-20120919.pdf>.
pub fn blob_challenge(poly_degree: u64, commitment: &[u8; 48], blob: &[u8]) -> Scalar {
    let hash_input_size = DOMAIN_SEP_BLOB.len()
        + size_of::<u64>() // polynomial degree
        + commitment.len()
        + blob.len();

    let mut hash_input: Vec<u8> = Vec::with_capacity(hash_input_size);

    hash_input.extend(DOMAIN_SEP_BLOB.as_bytes());
    hash_input.extend(poly_degree.to_le_bytes());
    hash_input.extend(commitment);
    hash_input.extend(blob);

    assert_eq!(hash_input.len(), hash_input_size);
    let mut hasher = Sha256::new();
    hasher.update(hash_input);
    let result: [u8; 32] = hasher.finalize().into();

    reduce_bytes_to_scalar(result)
}

/// Powers `1, r, r^2, ...` of the batch-verification challenge.
///
/// `r` is drawn from a transcript of every tuple in the batch: tag, the
/// polynomial degree and the batch size (8 bytes little-endian each), then
/// per tuple the commitment, `z`, `y` (32-byte big-endian scalars) and the
/// proof.
pub fn batch_challenge_powers(
    poly_degree: u64,
    commitments: &[&[u8; 48]],
    zs: &[Scalar],
    ys: &[Scalar],
    proofs: &[&[u8; 48]],
) -> Vec<Scalar> {
    let n = commitments.len();
    assert!(n == zs.len() && n == ys.len() && n == proofs.len());

    let hash_input_size = DOMAIN_SEP_BATCH.len()
        + size_of::<u64>() // polynomial degree
        + size_of::<u64>() // batch size
        + n * (48 + 32 + 32 + 48);

    let mut hash_input: Vec<u8> = Vec::with_capacity(hash_input_size);

    hash_input.extend(DOMAIN_SEP_BATCH.as_bytes());
    hash_input.extend(poly_degree.to_le_bytes());
    hash_input.extend((n as u64).to_le_bytes());

    for (((commitment, z), y), proof) in commitments.iter().zip(zs).zip(ys).zip(proofs) {
        hash_input.extend(*commitment);
        hash_input.extend(z.to_bytes_be());
        hash_input.extend(y.to_bytes_be());
        hash_input.extend(*proof);
    }

    assert_eq!(hash_input.len(), hash_input_size);
    let mut hasher = Sha256::new();
    hasher.update(hash_input);
    let result: [u8; 32] = hasher.finalize().into();

    let r = reduce_bytes_to_scalar(result);

    successors(Some(Scalar::ONE), |power| Some(*power * r))
        .take(n)
        .collect()
}

#[cfg(test)]
mod tests {
    use bls12_381::ff::Field;

    use super::*;

    #[test]
    fn blob_challenge_is_deterministic_and_binds_both_inputs() {
        let blob = vec![1u8; 64];
        let commitment = [2u8; 48];

        let challenge = blob_challenge(2, &commitment, &blob);
        assert_eq!(challenge, blob_challenge(2, &commitment, &blob));

        let mut other_blob = blob.clone();
        other_blob[0] ^= 1;
        assert_ne!(challenge, blob_challenge(2, &commitment, &other_blob));

        let mut other_commitment = commitment;
        other_commitment[0] ^= 1;
        assert_ne!(challenge, blob_challenge(2, &other_commitment, &blob));
    }

    #[test]
    fn batch_challenge_powers_are_consecutive_powers() {
        let commitment = [0u8; 48];
        let proof = [1u8; 48];
        let powers = batch_challenge_powers(
            4,
            &[&commitment; 3],
            &[Scalar::ONE; 3],
            &[Scalar::ZERO; 3],
            &[&proof; 3],
        );

        assert_eq!(powers.len(), 3);
        assert_eq!(powers[0], Scalar::ONE);
        assert_eq!(powers[2], powers[1] * powers[1]);
    }

    #[test]
    fn empty_batch_gives_no_powers() {
        let powers = batch_challenge_powers(4, &[], &[], &[], &[]);
        assert!(powers.is_empty());
    }
}
