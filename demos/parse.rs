use condlang::{evaluate, parse_condition, NoFiles};

fn main() {
    let subjects = [("age", "25"), ("status", ""), ("role", "owner")];
    let conditions = [
        "age >= 21",
        "status is not empty",
        "role in (admin,owner)",
        "age between (30, 18)",
        "age > abc",
    ];

    for text in conditions {
        match parse_condition(text) {
            Ok(cond) => {
                let subject = subjects
                    .iter()
                    .find(|(name, _)| *name == cond.subject())
                    .map(|(_, value)| *value);
                let shown = cond.to_string();
                match evaluate(&cond, subject, &NoFiles) {
                    Ok(result) => println!("{shown:<28} => {result}"),
                    Err(err) => println!("{shown:<28} => error: {err}"),
                }
            }
            Err(err) => println!("{text:<28} => {err}"),
        }
    }
}
