use ulid::Ulid;
use uuid::Uuid;

/// Produces new lexicographically sortable ID
pub fn new_uuid() -> Uuid {
    let ulid = Ulid::new();
    Uuid::from(ulid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uuid_is_sortable() {
        let first = new_uuid();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_uuid();
        assert!(first < second);
    }
}
