//! DMN 1.3 decision-table generation.

use std::fmt;

use indexmap::IndexSet;
use tracing::debug;

use crate::config::TableConfig;
use crate::xml::Escaped;
use crate::{Condition, FeelValue, Operator, Rule};

pub const DMN_MODEL_NS: &str = "https://www.omg.org/spec/DMN/20191111/MODEL/";
pub const DMNDI_NS: &str = "https://www.omg.org/spec/DMN/20191111/DMNDI/";
pub const DC_NS: &str = "http://www.omg.org/spec/DMN/20180521/DC/";
pub const CAMUNDA_NS: &str = "http://camunda.org/schema/1.0/dmn";

/// Cell text for a column the rule does not test.
pub const WILDCARD: &str = "-";
/// Cell text for an output the rule does not assign.
pub const NO_OUTPUT: &str = "null";

/// Render the DMN XML for `rules` with the given decision name and id.
///
/// See [`build_with`].
#[must_use]
pub fn build(rules: &[Rule], decision_name: &str, decision_id: &str) -> String {
    build_with(rules, &TableConfig::new(decision_name, decision_id))
}

/// Render the DMN XML for `rules`.
///
/// Produces one `definitions` document holding a single decision table with
/// hit policy `FIRST`. Rows follow the order of `rules`; input and output
/// columns follow the order in which their variables first appear.
#[must_use]
pub fn build_with(rules: &[Rule], config: &TableConfig) -> String {
    let table = DecisionTable::new(rules, config);
    debug!(
        decision = %config.decision_id,
        rules = rules.len(),
        inputs = table.inputs.len(),
        outputs = table.outputs.len(),
        "building decision table"
    );
    table.to_string()
}

/// FEEL text for one input-entry cell.
///
/// `in` operands are already FEEL literals, `contains` becomes a
/// `contains(., v)` call, equality is the bare value and every other
/// comparator is a unary test `op v`.
#[must_use]
pub fn input_entry(condition: Option<&Condition>) -> String {
    let Some(condition) = condition else {
        return WILDCARD.to_owned();
    };
    let value = FeelValue::classify(condition.value());
    match condition.operator() {
        Operator::In => condition.value().to_owned(),
        Operator::Contains => format!("contains(., {value})"),
        Operator::Equals => value.to_string(),
        op => format!("{op} {value}"),
    }
}

/// FEEL text for one output-entry cell.
#[must_use]
pub fn output_entry(value: Option<&str>) -> String {
    value.map_or_else(
        || NO_OUTPUT.to_owned(),
        |v| FeelValue::classify(v).to_string(),
    )
}

/// A rule set laid out as decision-table columns, ready to render.
#[derive(Debug)]
pub struct DecisionTable<'a> {
    rules: &'a [Rule],
    config: &'a TableConfig,
    inputs: IndexSet<&'a str>,
    outputs: IndexSet<&'a str>,
}

impl<'a> DecisionTable<'a> {
    #[must_use]
    pub fn new(rules: &'a [Rule], config: &'a TableConfig) -> Self {
        let mut inputs = IndexSet::new();
        let mut outputs = IndexSet::new();
        for rule in rules {
            inputs.extend(rule.conditions().iter().map(Condition::variable));
            outputs.extend(rule.actions().iter().map(|a| a.output_variable()));
        }
        Self {
            rules,
            config,
            inputs,
            outputs,
        }
    }

    /// Input column names, in first-seen order.
    pub fn inputs(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.inputs.iter().copied()
    }

    /// Output column names, in first-seen order.
    pub fn outputs(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.outputs.iter().copied()
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = Escaped(&self.config.decision_id);
        let name = Escaped(&self.config.decision_name);
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, r#"<definitions xmlns="{DMN_MODEL_NS}""#)?;
        writeln!(f, r#"             xmlns:dmndi="{DMNDI_NS}""#)?;
        writeln!(f, r#"             xmlns:dc="{DC_NS}""#)?;
        writeln!(f, r#"             xmlns:camunda="{CAMUNDA_NS}""#)?;
        writeln!(f, r#"             id="definitions_{id}""#)?;
        writeln!(f, r#"             name="{name}""#)?;
        writeln!(
            f,
            r#"             namespace="{}">"#,
            Escaped(&self.config.namespace)
        )?;
        writeln!(f)?;
        writeln!(f, r#"  <decision id="{id}" name="{name}">"#)?;
        writeln!(
            f,
            r#"    <decisionTable id="decisionTable_{id}" hitPolicy="FIRST">"#
        )
    }

    fn write_columns(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for var in self.inputs() {
            let var = Escaped(var);
            writeln!(f, r#"      <input id="input_{var}" label="{var}">"#)?;
            writeln!(
                f,
                r#"        <inputExpression id="inputExpression_{var}" typeRef="string">"#
            )?;
            writeln!(f, "          <text>{var}</text>")?;
            writeln!(f, "        </inputExpression>")?;
            writeln!(f, "      </input>")?;
        }
        for var in self.outputs() {
            let var = Escaped(var);
            writeln!(
                f,
                r#"      <output id="output_{var}" label="{var}" name="{var}" typeRef="string" />"#
            )?;
        }
        Ok(())
    }

    fn write_rule(&self, f: &mut fmt::Formatter<'_>, rule: &Rule) -> fmt::Result {
        let rule_id = Escaped(rule.id());
        writeln!(f, r#"      <rule id="{rule_id}">"#)?;
        for var in self.inputs() {
            let text = input_entry(rule.condition_on(var));
            writeln!(
                f,
                r#"        <inputEntry id="inputEntry_{rule_id}_{}">"#,
                Escaped(var)
            )?;
            writeln!(f, "          <text>{}</text>", Escaped(&text))?;
            writeln!(f, "        </inputEntry>")?;
        }
        for var in self.outputs() {
            let text = output_entry(rule.action_for(var).map(|a| a.output_value()));
            writeln!(
                f,
                r#"        <outputEntry id="outputEntry_{rule_id}_{}">"#,
                Escaped(var)
            )?;
            writeln!(f, "          <text>{}</text>", Escaped(&text))?;
            writeln!(f, "        </outputEntry>")?;
        }
        writeln!(f, "      </rule>")
    }
}

impl fmt::Display for DecisionTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_columns(f)?;
        for rule in self.rules {
            self.write_rule(f, rule)?;
        }
        writeln!(f, "    </decisionTable>")?;
        writeln!(f, "  </decision>")?;
        writeln!(f, "</definitions>")
    }
}
