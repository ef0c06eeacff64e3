use dmnify::validate::Document;
use dmnify::{build, parse_rule, validate};

fn main() {
    let rules = [
        parse_rule("If note is <b>&\"bold\"</b>, reply is a < b.").expect("valid rule"),
        parse_rule("Otherwise, reply is none.").expect("valid rule"),
    ];
    let xml = build(&rules, "Escaping", "escaping");
    print!("{}", validate(&xml));

    // Read the cells back
    let doc = Document::parse(&xml).expect("builder output is well-formed");
    for entry in doc.find_all("inputEntry") {
        println!("{} = {}", entry.attribute("id").unwrap_or("?"), entry.children()[0].text());
    }

    // Broken documents are reported, never panicked on
    print!("{}", validate("<definitions><decision></definitions>"));
}
