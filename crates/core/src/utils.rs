use uuid::Uuid;

/// Random hex id of at most 32 characters.
pub fn generate_short_id(len: usize) -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(len);
    id
}

/// Correlates the log lines of one invocation.
pub fn invocation_id() -> String {
    generate_short_id(8)
}
