use bls12_381::{ff::Field, Scalar};
use polynomial::{bit_reversal_permutation, domain::Domain, reverse_bits};

/// The shifts generating each coset.
///
/// The full `num_points` domain splits into `num_cosets` cosets of a
/// smaller subgroup; coset `i` is the subgroup shifted by `omega^i` where
/// `omega` generates the full domain. With `bit_reversed` set, the shifts
/// come out in the order the wire format uses, which is the same split one
/// gets by chunking the bit-reversed full domain.
pub fn coset_gens(num_points: usize, num_cosets: usize, bit_reversed: bool) -> Vec<Scalar> {
    // Building the domain just for its generator is wasteful, but this
    // only runs at setup.
    let domain = Domain::new(num_points);
    let coset_gen = domain.generator;

    let mut gens = Vec::with_capacity(num_cosets);
    for i in 0..num_cosets {
        let exponent = if bit_reversed {
            reverse_bits(i, num_cosets.ilog2()) as u64
        } else {
            i as u64
        };
        gens.push(coset_gen.pow_vartime([exponent]));
    }

    gens
}

/// Reassembles (partial) coset evaluations into one flat evaluation vector
/// in domain order, as if the polynomial had been FFT'd over the full
/// domain with no bit-reversal.
///
/// Missing cosets are filled with zeroes. Returns the coset indices mapped
/// to their position in the domain-order layout (the bit-reversal of the
/// wire-order index), alongside the flat evaluations: the values of coset
/// `j` (domain order) sit at positions `j, j + k, j + 2k, ...` where `k`
/// is the number of cosets.
///
/// Returns `None` if the evaluation lists have mismatched lengths or any
/// index is out of bounds; the caller is responsible for deduplication.
pub fn recover_evaluations_in_domain_order(
    domain_size: usize,
    coset_indices: Vec<usize>,
    coset_evaluations: Vec<Vec<Scalar>>,
) -> Option<(Vec<usize>, Vec<Scalar>)> {
    assert_eq!(coset_indices.len(), coset_evaluations.len());

    if coset_indices.is_empty() {
        return None;
    }

    let mut elements = vec![Scalar::ZERO; domain_size];

    let coset_len = coset_evaluations[0].len();
    let same_len = coset_evaluations
        .iter()
        .all(|coset| coset.len() == coset_len);
    if !same_len {
        return None;
    }

    // The largest position written below is `coset_index * coset_len`, so
    // every index must stay under `domain_size / coset_len`.
    let index_bound = domain_size / coset_len;
    let all_indices_within_bound = coset_indices.iter().all(|index| *index < index_bound);
    if !all_indices_within_bound {
        return None;
    }

    // Wire order is the bit-reversed chunking of the domain, so placing
    // each coset at its chunk and un-permuting the whole vector yields
    // domain order.
    for (&coset_index, coset_evals) in coset_indices.iter().zip(coset_evaluations) {
        let start = coset_index * coset_len;
        let end = start + coset_len;
        elements[start..end].copy_from_slice(&coset_evals);
    }

    bit_reversal_permutation(&mut elements);

    let cosets_per_full_domain = domain_size / coset_len;
    let num_bits = cosets_per_full_domain.ilog2();
    let new_coset_indices: Vec<_> = coset_indices
        .into_iter()
        .map(|wire_index| reverse_bits(wire_index, num_bits))
        .collect();

    Some((new_coset_indices, elements))
}
