use dmnify::validate::Document;
use dmnify::{
    Action, Condition, NO_OUTPUT, Operator, Rule, TableConfig, WILDCARD, build, build_with,
    parse_rule, validate,
};

fn entries<'a>(doc: &'a Document, tag: &str) -> Vec<&'a str> {
    doc.find_all(tag)
        .into_iter()
        .map(|e| e.children()[0].text())
        .collect()
}

#[test]
fn empty_rule_list_still_builds_a_valid_table() {
    let xml = build(&[], "Empty", "empty");
    let report = validate(&xml);
    assert!(report.is_valid(), "{report}");
    let doc = Document::parse(&xml).unwrap();
    assert!(doc.find_all("rule").is_empty());
    assert!(doc.find_all("input").is_empty());
}

#[test]
fn missing_columns_are_wildcards_and_nulls() {
    let rules = [
        parse_rule("If age > 18, eligible is true.").unwrap(),
        parse_rule("If country is US, tier is gold.").unwrap(),
    ];
    let doc = Document::parse(&build(&rules, "D", "d")).unwrap();

    assert_eq!(entries(&doc, "inputEntry"), ["> 18", WILDCARD, WILDCARD, "\"US\""]);
    assert_eq!(entries(&doc, "outputEntry"), ["true", NO_OUTPUT, NO_OUTPUT, "\"gold\""]);
}

#[test]
fn columns_follow_first_appearance() {
    let rules = [
        parse_rule("If zeta is 1 and alpha is 2, out is x.").unwrap(),
        parse_rule("If mid is 3 and zeta is 4, out is y and extra is z.").unwrap(),
    ];
    let doc = Document::parse(&build(&rules, "D", "d")).unwrap();
    let inputs: Vec<_> = doc
        .find_all("input")
        .into_iter()
        .filter_map(|e| e.attribute("label"))
        .collect();
    assert_eq!(inputs, ["zeta", "alpha", "mid"]);
    let outputs: Vec<_> = doc
        .find_all("output")
        .into_iter()
        .filter_map(|e| e.attribute("name"))
        .collect();
    assert_eq!(outputs, ["out", "extra"]);
}

#[test]
fn markup_in_values_is_escaped() {
    let rule = Rule::new(
        "r1",
        vec![Condition::new("note", Operator::Equals, r#"<b>"Tom" & 'Jerry'</b>"#)],
        vec![Action::new("reply", "a < b && c > d")],
        "",
    )
    .unwrap();
    let xml = build(&[rule], "D", "d");
    assert!(validate(&xml).is_valid());

    let doc = Document::parse(&xml).unwrap();
    assert_eq!(
        entries(&doc, "inputEntry"),
        [r#""<b>"Tom" & 'Jerry'</b>""#]
    );
    assert_eq!(entries(&doc, "outputEntry"), [r#""a < b && c > d""#]);
}

#[test]
fn decision_name_and_id_are_escaped() {
    let table = TableConfig::new("Fish & Chips <v2>", "fish\"chips");
    let xml = build_with(&[parse_rule("If a is 1, b is 2.").unwrap()], &table);
    let doc = Document::parse(&xml).unwrap();
    let decision = doc.find_all("decision")[0];
    assert_eq!(decision.attribute("name"), Some("Fish & Chips <v2>"));
    assert_eq!(decision.attribute("id"), Some("fish\"chips"));
}

#[test]
fn otherwise_rule_tests_the_always_true_column() {
    let rules = [
        parse_rule("If tier is gold, discount is 20%.").unwrap(),
        parse_rule("Otherwise, discount is 0%.").unwrap(),
    ];
    let doc = Document::parse(&build(&rules, "D", "d")).unwrap();
    let inputs: Vec<_> = doc
        .find_all("input")
        .into_iter()
        .filter_map(|e| e.attribute("label"))
        .collect();
    assert_eq!(inputs, ["tier", "1"]);
    assert_eq!(entries(&doc, "inputEntry"), ["\"gold\"", WILDCARD, WILDCARD, "1"]);
}

#[test]
fn contains_and_ranges_render_as_feel() {
    let rules = [
        parse_rule("If tags contains any vip and score between 1 and 5, lane is fast.").unwrap(),
        parse_rule("If region in (north, south), lane is slow.").unwrap(),
    ];
    let doc = Document::parse(&build(&rules, "D", "d")).unwrap();
    assert_eq!(
        entries(&doc, "inputEntry"),
        [
            "contains(., \"vip\")",
            "[1..5]",
            WILDCARD,
            WILDCARD,
            WILDCARD,
            r#"["north", "south"]"#,
        ]
    );
}

#[test]
fn non_ascii_text_survives() {
    let rule = parse_rule("If city is Zürich, prix is 5 €.").unwrap();
    let doc = Document::parse(&build(&[rule], "D", "d")).unwrap();
    assert_eq!(entries(&doc, "inputEntry"), ["\"Zürich\""]);
    assert_eq!(entries(&doc, "outputEntry"), ["\"5 €\""]);
}

#[test]
fn non_ascii_variables_are_rejected() {
    assert!(parse_rule("If città is Roma, prix is 5.").is_err());
}

#[test]
fn long_rule_lines() {
    let clauses: Vec<String> = (0..200).map(|i| format!("field{i} is v{i}")).collect();
    let line = format!("If {}, result is done.", clauses.join(" and "));
    let rule = parse_rule(&line).unwrap();
    assert_eq!(rule.conditions().len(), 200);
    assert!(validate(&build(&[rule], "D", "d")).is_valid());
}
