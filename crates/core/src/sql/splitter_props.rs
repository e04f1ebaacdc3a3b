//! Property-based tests for statement splitting.
//!
//! Generated scripts mix plain statements with literals, quoted identifiers
//! and dollar-quoted bodies that all carry embedded semicolons, joined by a
//! random choice of separators and comments.

use proptest::prelude::*;

use super::splitter::split_statements;

/// Strategy for a single statement with no terminating semicolon.
fn statement_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{1,12}".prop_map(|name| format!("CREATE TABLE IF NOT EXISTS {name} (id uuid)")),
        "[a-z ;]{0,16}".prop_map(|body| format!("INSERT INTO notes (body) VALUES ('{body}')")),
        "[a-z;]{1,8}".prop_map(|name| format!("CREATE TABLE \"{name}\" (id int)")),
        "[a-z_]{1,8}".prop_map(|name| format!("DO $$ BEGIN PERFORM {name}; RETURN; END $$")),
        "[a-z]{1,6}".prop_map(|tag| format!("DO ${tag}$ BEGIN RAISE NOTICE ';'; END ${tag}$")),
        Just("SELECT 1 /* ; */ + 1".to_string()),
    ]
}

/// Strategy for whatever sits between two statements, semicolon included.
fn separator_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(";\n"),
        Just("; "),
        Just(";\n\n-- next statement;\n"),
        Just(";\n/* block; comment */\n"),
        Just(";\n;\n"),
    ]
}

fn script(statements: &[String], separators: &[&str]) -> String {
    let mut out = String::new();
    for (statement, separator) in statements.iter().zip(separators.iter().cycle()) {
        out.push_str(statement);
        out.push_str(separator);
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// N terminated statements split into exactly N statements, text intact.
    #[test]
    fn prop_split_count_matches(
        statements in prop::collection::vec(statement_strategy(), 1..12),
        separators in prop::collection::vec(separator_strategy(), 1..4),
    ) {
        let input = script(&statements, &separators);
        let split = split_statements(&input).unwrap();

        prop_assert_eq!(split.len(), statements.len());
        for (got, expected) in split.iter().zip(statements.iter()) {
            prop_assert_eq!(&got.sql, expected);
        }
    }

    /// Joining the split statements back with semicolons reproduces them.
    #[test]
    fn prop_rejoin_round_trips(
        statements in prop::collection::vec(statement_strategy(), 1..12),
        separators in prop::collection::vec(separator_strategy(), 1..4),
    ) {
        let input = script(&statements, &separators);
        let first = split_statements(&input).unwrap();

        let rejoined: String = first.iter().map(|s| format!("{};\n", s.sql)).collect();
        let second = split_statements(&rejoined).unwrap();

        let first_sql: Vec<&str> = first.iter().map(|s| s.sql.as_str()).collect();
        let second_sql: Vec<&str> = second.iter().map(|s| s.sql.as_str()).collect();
        prop_assert_eq!(first_sql, second_sql);
    }

    /// Comment-only scripts never produce a statement.
    #[test]
    fn prop_comment_only_scripts_are_empty(
        lines in prop::collection::vec("[a-z ;]{0,20}", 0..8),
        use_block in any::<bool>(),
    ) {
        let input: String = if use_block {
            lines.iter().map(|l| format!("/* {l} */\n")).collect()
        } else {
            lines.iter().map(|l| format!("-- {l}\n")).collect()
        };
        prop_assert!(split_statements(&input).unwrap().is_empty());
    }

    /// Statement indexes are dense and lines never go backwards.
    #[test]
    fn prop_indexes_and_lines_are_ordered(
        statements in prop::collection::vec(statement_strategy(), 1..12),
        separators in prop::collection::vec(separator_strategy(), 1..4),
    ) {
        let input = script(&statements, &separators);
        let split = split_statements(&input).unwrap();

        for (i, statement) in split.iter().enumerate() {
            prop_assert_eq!(statement.index, i);
        }
        for pair in split.windows(2) {
            prop_assert!(pair[0].line <= pair[1].line);
        }
    }
}
