//! Task id generation
//!
//! Ids are fixed-length alphanumeric strings, assigned once at task creation.
//! Uniqueness across the process lifetime is assumed from the keyspace
//! (62^8), not enforced.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Length of generated task ids.
pub const TASK_ID_LEN: usize = 8;

/// Generates an 8-character alphanumeric task id.
pub fn generate_task_id() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TASK_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_length() {
        assert_eq!(generate_task_id().len(), TASK_ID_LEN);
    }

    #[test]
    fn test_id_is_alphanumeric() {
        let id = generate_task_id();
        assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_ids_vary() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| generate_task_id()).collect();
        // Collisions in 100 draws from a 62^8 keyspace would point at a
        // broken generator
        assert_eq!(ids.len(), 100);
    }
}
