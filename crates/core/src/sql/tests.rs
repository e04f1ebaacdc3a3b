use rstest::rstest;

use super::*;

fn sqls(input: &str) -> Vec<String> {
    split_statements(input)
        .unwrap()
        .into_iter()
        .map(|s| s.sql)
        .collect()
}

#[test]
fn test_splits_on_top_level_semicolons() {
    let input = "CREATE TABLE a (id int);\nCREATE INDEX a_id ON a (id);\n";
    assert_eq!(
        sqls(input),
        vec!["CREATE TABLE a (id int)", "CREATE INDEX a_id ON a (id)"]
    );
}

#[test]
fn test_statement_indexes_and_lines() {
    let input = "-- header\n\nSELECT 1;\n\n/* block\n comment */\nSELECT\n  2;";
    let statements = split_statements(input).unwrap();

    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].index, 0);
    assert_eq!(statements[0].line, 3);
    assert_eq!(statements[1].index, 1);
    assert_eq!(statements[1].line, 7);
    assert_eq!(statements[1].sql, "SELECT\n  2");
}

#[rstest]
#[case::empty("")]
#[case::whitespace("  \n\t\n")]
#[case::line_comment("-- nothing to see here\n")]
#[case::line_comment_with_semicolon("-- drop table x;\n")]
#[case::block_comment("/* CREATE TABLE x (id int); */")]
#[case::nested_block_comment("/* outer /* inner; */ still outer; */")]
#[case::bare_semicolons(";;\n;")]
#[case::comments_between_semicolons("-- a\n;\n/* b */;\n")]
fn test_comment_only_input_yields_nothing(#[case] input: &str) {
    assert!(split_statements(input).unwrap().is_empty());
}

#[test]
fn test_trailing_statement_without_semicolon() {
    assert_eq!(sqls("SELECT 1;\nSELECT 2"), vec!["SELECT 1", "SELECT 2"]);
}

#[test]
fn test_trailing_comment_after_last_statement() {
    assert_eq!(sqls("SELECT 1;\n-- done\n"), vec!["SELECT 1"]);
}

#[rstest]
#[case::string_literal(
    "INSERT INTO notes (body) VALUES ('a; b');",
    "INSERT INTO notes (body) VALUES ('a; b')"
)]
#[case::doubled_quote(
    "INSERT INTO notes (body) VALUES ('it''s; fine');",
    "INSERT INTO notes (body) VALUES ('it''s; fine')"
)]
#[case::escape_string(
    r"INSERT INTO notes (body) VALUES (E'quote \'; still inside');",
    r"INSERT INTO notes (body) VALUES (E'quote \'; still inside')"
)]
#[case::quoted_identifier(
    r#"CREATE TABLE "odd;name" (id int);"#,
    r#"CREATE TABLE "odd;name" (id int)"#
)]
#[case::inline_comment(
    "SELECT 1 /* ; */ + 1;",
    "SELECT 1 /* ; */ + 1"
)]
#[case::anonymous_dollar_body(
    "DO $$ BEGIN PERFORM 1; PERFORM 2; END $$;",
    "DO $$ BEGIN PERFORM 1; PERFORM 2; END $$"
)]
#[case::tagged_dollar_body(
    "DO $body$ BEGIN RAISE NOTICE '$$;'; END $body$;",
    "DO $body$ BEGIN RAISE NOTICE '$$;'; END $body$"
)]
fn test_semicolons_inside_tokens_do_not_split(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sqls(input), vec![expected]);
}

#[test]
fn test_word_ending_in_e_is_not_escape_string() {
    // `type` ends in `e`; the backslash must not escape the closing quote.
    let input = r"SELECT type'\'; SELECT 2;";
    assert_eq!(sqls(input), vec![r"SELECT type'\'", "SELECT 2"]);
}

#[test]
fn test_positional_parameters_are_not_dollar_quotes() {
    let input = "PREPARE q AS SELECT $1 + $2;\nSELECT 3;";
    assert_eq!(sqls(input), vec!["PREPARE q AS SELECT $1 + $2", "SELECT 3"]);
}

#[test]
fn test_dollar_inside_identifier_is_not_a_quote() {
    let input = "SELECT price$usd FROM t;\nSELECT 2;";
    assert_eq!(sqls(input), vec!["SELECT price$usd FROM t", "SELECT 2"]);
}

#[test]
fn test_function_and_trigger_definitions() {
    let input = r"
CREATE OR REPLACE FUNCTION public.handle_new_user()
RETURNS TRIGGER AS $$
BEGIN
  PERFORM public.create_default_categories(NEW.id);
  RETURN NEW;
END;
$$ LANGUAGE plpgsql SECURITY DEFINER;

DROP TRIGGER IF EXISTS on_auth_user_created ON auth.users;
CREATE TRIGGER on_auth_user_created
  AFTER INSERT ON auth.users
  FOR EACH ROW EXECUTE FUNCTION public.handle_new_user();
";
    let statements = split_statements(input).unwrap();

    assert_eq!(statements.len(), 3);
    assert!(statements[0].sql.starts_with("CREATE OR REPLACE FUNCTION"));
    assert!(statements[0].sql.ends_with("SECURITY DEFINER"));
    assert_eq!(statements[0].line, 2);
    assert_eq!(
        statements[1].sql,
        "DROP TRIGGER IF EXISTS on_auth_user_created ON auth.users"
    );
    assert_eq!(statements[1].line, 10);
    assert_eq!(statements[2].line, 11);
}

#[test]
fn test_multibyte_text_survives() {
    let input = "INSERT INTO goals (name) VALUES ('Épargne 🏖️');\nSELECT 'ü';";
    assert_eq!(
        sqls(input),
        vec!["INSERT INTO goals (name) VALUES ('Épargne 🏖️')", "SELECT 'ü'"]
    );
}

#[rstest]
#[case::string("SELECT 1;\nSELECT 'open", SplitError::UnterminatedString { line: 2 })]
#[case::escape_string_trailing_backslash(r"SELECT E'\", SplitError::UnterminatedString { line: 1 })]
#[case::identifier("SELECT \"open\n", SplitError::UnterminatedIdentifier { line: 1 })]
#[case::comment("SELECT 1;\n\n/* never /* closed */", SplitError::UnterminatedComment { line: 3 })]
#[case::dollar(
    "SELECT 1;\nDO $fn$ BEGIN END",
    SplitError::UnterminatedDollarQuote { tag: "$fn$".to_string(), line: 2 }
)]
fn test_unterminated_constructs(#[case] input: &str, #[case] expected: SplitError) {
    assert_eq!(split_statements(input).unwrap_err(), expected);
}

#[test]
fn test_split_error_display() {
    assert_eq!(
        SplitError::UnterminatedDollarQuote {
            tag: "$$".to_string(),
            line: 4
        }
        .to_string(),
        "Unterminated dollar-quoted string $$ starting on line 4"
    );
}

#[test]
fn test_preview_collapses_newlines() {
    assert_eq!(
        preview("CREATE TABLE a (\n  id int\n)", PREVIEW_CHARS),
        "CREATE TABLE a (   id int )"
    );
}

#[test]
fn test_preview_truncates() {
    let sql = "x".repeat(PREVIEW_CHARS + 5);
    let out = preview(&sql, PREVIEW_CHARS);
    assert_eq!(out.len(), PREVIEW_CHARS + 3);
    assert!(out.ends_with("..."));
}

#[test]
fn test_preview_exact_length_has_no_ellipsis() {
    let sql = "y".repeat(PREVIEW_CHARS);
    assert_eq!(preview(&sql, PREVIEW_CHARS), sql);
}

#[test]
fn test_preview_counts_characters_not_bytes() {
    let out = preview("ééééé", 3);
    assert_eq!(out, "ééé...");
}

#[test]
fn test_statement_preview_uses_default_width() {
    let statements = split_statements(&format!("SELECT '{}';", "z".repeat(100))).unwrap();
    assert_eq!(statements[0].preview().chars().count(), PREVIEW_CHARS + 3);
}
