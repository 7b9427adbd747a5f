//! Proof-of-work puzzle: find `proof` such that
//! `sha256(str(proof² − previous_proof²))` starts with [`DIFFICULTY_PREFIX`].
//!
//! The difficulty is fixed. [`ProofOfWork::solve`] has no upper bound and
//! would loop forever against an unsatisfiable prefix; that cannot happen
//! at four hex zeros but is a hazard if the prefix is ever raised far
//! enough. Callers that need a bound use [`ProofOfWork::solve_bounded`].

use sha2::{Digest, Sha256};

use super::DIFFICULTY_PREFIX;

pub struct ProofOfWork;

impl ProofOfWork {
    /// Ascending search from 1 for the first valid proof.
    pub fn solve(previous_proof: u64) -> u64 {
        let mut candidate: u64 = 1;
        while !Self::is_valid(candidate, previous_proof) {
            candidate += 1;
        }
        candidate
    }

    /// Same search as `solve`, giving up after `max_attempts` candidates.
    pub fn solve_bounded(previous_proof: u64, max_attempts: u64) -> Option<u64> {
        (1..=max_attempts).find(|&candidate| Self::is_valid(candidate, previous_proof))
    }

    pub fn is_valid(proof: u64, previous_proof: u64) -> bool {
        Self::digest(proof, previous_proof).starts_with(DIFFICULTY_PREFIX)
    }

    /// Hex digest of the signed decimal `proof² − previous_proof²`.
    pub fn digest(proof: u64, previous_proof: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(difference_of_squares(proof, previous_proof).as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// u64² always fits in u128, so the sign is tracked separately and the
/// result is exact for every input.
fn difference_of_squares(proof: u64, previous_proof: u64) -> String {
    let a = u128::from(proof) * u128::from(proof);
    let b = u128::from(previous_proof) * u128::from(previous_proof);
    if a >= b {
        (a - b).to_string()
    } else {
        format!("-{}", b - a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_keeps_sign() {
        assert_eq!(difference_of_squares(3, 2), "5");
        assert_eq!(difference_of_squares(2, 3), "-5");
        assert_eq!(difference_of_squares(7, 7), "0");
        assert_eq!(
            difference_of_squares(u64::MAX, 0),
            (u128::from(u64::MAX) * u128::from(u64::MAX)).to_string()
        );
    }

    #[test]
    fn solved_proof_self_validates() {
        for previous in [1u64, 2, 533, 45293] {
            let proof = ProofOfWork::solve(previous);
            assert!(ProofOfWork::is_valid(proof, previous));
            assert!(ProofOfWork::digest(proof, previous).starts_with("0000"));
        }
    }

    #[test]
    fn solve_returns_first_valid_candidate() {
        let proof = ProofOfWork::solve(1);
        assert!((1..proof).all(|c| !ProofOfWork::is_valid(c, 1)));
    }

    #[test]
    fn bounded_search_matches_unbounded() {
        let proof = ProofOfWork::solve(1);
        assert_eq!(ProofOfWork::solve_bounded(1, proof), Some(proof));
        assert_eq!(ProofOfWork::solve_bounded(1, proof - 1), None);
    }
}
