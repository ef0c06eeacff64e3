
use dmnify::validate::Document;
use dmnify::{TableConfig, build_with, input_entry, output_entry, parse_rule, partition, validate};
use proptest::prelude::*;
use strategies::{arb_rule_line, arb_rules};

fn table() -> TableConfig {
    TableConfig::new("Generated", "generated")
}

// ---------------------------------------------------------------------------
// Invariant 1: Partitioning
//
// Chunk count is ceil(n / m) (one chunk when the input is empty or unbounded)
// and the chunks concatenate back to the input.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn partition_chunk_count(items in prop::collection::vec(any::<u16>(), 0..300), max in 1_usize..64) {
        let chunks = partition(&items, max);
        let expected = if items.is_empty() { 1 } else { items.len().div_ceil(max) };
        prop_assert_eq!(chunks.len(), expected);
        prop_assert!(chunks.iter().all(|c| c.len() <= max));
    }

    #[test]
    fn partition_concatenates(items in prop::collection::vec(any::<u16>(), 0..300), max in 0_usize..64) {
        let joined: Vec<u16> = partition(&items, max).concat();
        prop_assert_eq!(joined, items);
    }

    #[test]
    fn partition_unbounded(items in prop::collection::vec(any::<u16>(), 0..300)) {
        prop_assert_eq!(partition(&items, 0).len(), 1);
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Building
//
// Output is deterministic, valid, has one row per rule in input order, and
// every cell reads back exactly as rendered.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn build_is_deterministic(rules in arb_rules(20)) {
        let first = build_with(&rules, &table());
        let second = build_with(&rules, &table());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn build_output_validates(rules in arb_rules(20)) {
        let xml = build_with(&rules, &table());
        let report = validate(&xml);
        prop_assert!(report.is_valid(), "{}", report);
    }

    #[test]
    fn rows_match_rules_in_order(rules in arb_rules(30)) {
        let xml = build_with(&rules, &table());
        let doc = Document::parse(&xml).unwrap();
        let ids: Vec<&str> = doc.find_all("rule").into_iter().filter_map(|r| r.attribute("id")).collect();
        let expected: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn cells_survive_escaping(rules in arb_rules(10)) {
        let xml = build_with(&rules, &table());
        let doc = Document::parse(&xml).unwrap();
        let inputs: Vec<&str> = doc.find_all("input").into_iter().filter_map(|e| e.attribute("label")).collect();
        let outputs: Vec<&str> = doc.find_all("output").into_iter().filter_map(|e| e.attribute("name")).collect();

        for (rule, row) in rules.iter().zip(doc.find_all("rule")) {
            let cells: Vec<&str> = row.children_named("inputEntry").map(|e| e.children()[0].text()).collect();
            let expected: Vec<String> = inputs.iter().map(|v| input_entry(rule.condition_on(v))).collect();
            prop_assert_eq!(cells, expected);

            let cells: Vec<&str> = row.children_named("outputEntry").map(|e| e.children()[0].text()).collect();
            let expected: Vec<String> = outputs
                .iter()
                .map(|v| output_entry(rule.action_for(v).map(|a| a.output_value())))
                .collect();
            prop_assert_eq!(cells, expected);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Parsing
//
// Well-formed lines parse, keeping the variables and operators in order.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn well_formed_lines_round_trip(line in arb_rule_line()) {
        let rule = parse_rule(&line.text).unwrap();
        let conditions: Vec<(String, _)> = rule
            .conditions()
            .iter()
            .map(|c| (c.variable().to_owned(), c.operator()))
            .collect();
        prop_assert_eq!(conditions, line.conditions);
        let actions: Vec<String> = rule.actions().iter().map(|a| a.output_variable().to_owned()).collect();
        prop_assert_eq!(actions, line.actions);
    }

    #[test]
    fn parse_never_panics(text in "\\PC{0,80}") {
        let _ = parse_rule(&text);
    }
}
