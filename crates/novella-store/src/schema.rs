//! Story database schema.

/// SQL to create the story tables. Kept identical to
/// `migrations/0001_story_schema.sql`.
pub const CREATE_STORY_TABLES: &str = include_str!("../../../migrations/0001_story_schema.sql");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creates_every_story_table() {
        for table in [
            "locations",
            "characters",
            "events",
            "scenes",
            "sprites",
            "choices",
            "lines",
            "scene_transitions",
            "playthrough_flags",
        ] {
            assert!(
                CREATE_STORY_TABLES.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
                "missing table {table}"
            );
        }
    }
}
