use dmnify::{convert, parse_many, ConvertConfig, TableConfig};

fn main() {
    let text = "\
If customer is platinum and total amount > 3000, discount is 25%.
If total amount between 1000 and 3000, discount is 15%.
If customer membership in (silver, bronze), discount is 5%.
this line is not a rule
Otherwise, discount is 0%.
";

    // Parse and inspect
    let parsed = parse_many(text);
    for rule in &parsed.rules {
        println!("{rule}");
        for condition in rule.conditions() {
            println!("  when {condition}");
        }
        for action in rule.actions() {
            println!("  then {action}");
        }
    }
    for skipped in &parsed.skipped {
        println!("skipped line {}: {}", skipped.line_number, skipped.error);
    }

    // Convert to DMN
    let table = TableConfig::new("Order Discounts", "order_discounts");
    let conversion = convert(text, &table, &ConvertConfig::default()).expect("conversion failed");
    println!();
    println!("{}", conversion.documents[0]);
}
