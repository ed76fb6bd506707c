use bls12_381::{batch_inversion::batch_inverse, ff::Field, Scalar};
use maybe_rayon::prelude::*;
use polynomial::domain::Domain;

/// Evaluates a polynomial given in natural-order evaluation form at `z`.
///
/// If `z` is a domain root the stored evaluation is returned; otherwise the
/// barycentric formula is used.
pub(crate) fn evaluate(domain: &Domain, evaluations: &[Scalar], z: Scalar) -> Scalar {
    domain.roots.iter().position(|root| *root == z).map_or_else(
        || evaluate_out_of_domain(domain, evaluations, z),
        |position| evaluations[position],
    )
}

/// Barycentric evaluation at a point off the domain:
///
/// `p(z) = (z^n - 1)/n * sum_i p(w^i) * w^i / (z - w^i)`
fn evaluate_out_of_domain(domain: &Domain, evaluations: &[Scalar], z: Scalar) -> Scalar {
    let domain_size = domain.roots.len();

    let mut denoms = (&domain.roots)
        .maybe_par_iter()
        .map(|root| z - *root)
        .collect::<Vec<_>>();
    batch_inverse(&mut denoms);

    (&domain.roots)
        .maybe_par_iter()
        .zip(evaluations)
        .zip(&denoms)
        .map(|((root, eval), denom)| root * *eval * denom)
        .sum::<Scalar>()
        * (z.pow_vartime([domain_size as u64]) - Scalar::ONE)
        * domain.domain_size_inv
}

/// Computes the evaluation `y = p(z)` and the opening quotient
/// `q(X) = (p(X) - y) / (X - z)` in natural-order evaluation form.
pub(crate) fn evaluate_and_quotient(
    domain: &Domain,
    evaluations: &[Scalar],
    z: Scalar,
) -> (Scalar, Vec<Scalar>) {
    match domain.roots.iter().position(|root| *root == z) {
        Some(position) => quotient_within_domain(domain, evaluations, position),
        None => quotient_out_of_domain(domain, evaluations, z),
    }
}

fn quotient_out_of_domain(
    domain: &Domain,
    evaluations: &[Scalar],
    z: Scalar,
) -> (Scalar, Vec<Scalar>) {
    let mut denoms = (&domain.roots)
        .maybe_par_iter()
        .map(|root| z - *root)
        .collect::<Vec<_>>();
    batch_inverse(&mut denoms);

    let domain_size = domain.roots.len();

    let y = (&domain.roots)
        .maybe_par_iter()
        .zip(evaluations)
        .zip(&denoms)
        .map(|((root, eval), denom)| root * *eval * denom)
        .sum::<Scalar>()
        * (z.pow_vartime([domain_size as u64]) - Scalar::ONE)
        * domain.domain_size_inv;

    // q(w^i) = (y - p(w^i)) / (z - w^i)
    let quotient = denoms
        .maybe_into_par_iter()
        .zip(evaluations)
        .map(|(denom, eval)| (y - *eval) * denom)
        .collect();

    (y, quotient)
}

/// The quotient when `z = w^m` is a domain root.
///
/// At index `m` the naive formula is 0/0; the value there is fixed by the
/// other quotient evaluations through
/// `q(w^m) = -sum_{j != m} q(w^j) w^(j-m)`.
///
/// See "Dividing when one of the points is zero" in
/// <https://dankradfeist.de/ethereum/2021/06/18/pcs-multiproofs.html>.
fn quotient_within_domain(
    domain: &Domain,
    evaluations: &[Scalar],
    position: usize,
) -> (Scalar, Vec<Scalar>) {
    let domain_size = domain.roots.len();

    let z = domain.roots[position];
    let y = evaluations[position];

    // 1 / (w^m - w^j); the j == m slot is set to one so that the batch
    // inversion goes through.
    let mut denoms = (&domain.roots)
        .maybe_par_iter()
        .enumerate()
        .map(|(idx, root)| {
            if idx == position {
                Scalar::ONE
            } else {
                z - root
            }
        })
        .collect::<Vec<_>>();
    batch_inverse(&mut denoms);

    // (y - p(w^j)) / (w^m - w^j), zero at j == m for now.
    let mut quotient = denoms
        .maybe_into_par_iter()
        .zip(evaluations)
        .map(|(denom, eval)| (y - *eval) * denom)
        .collect::<Vec<_>>();

    quotient[position] = Scalar::ZERO;
    quotient[position] = -(&quotient)
        .maybe_par_iter()
        .enumerate()
        .map(|(idx, q)| {
            let root_j_minus_m = domain.roots[(domain_size + idx - position) % domain_size];
            *q * root_j_minus_m
        })
        .sum::<Scalar>();

    (y, quotient)
}
