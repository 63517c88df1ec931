// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg(test)]

use std::env;

use anyhow::{bail, Result};
use serde::Deserialize;
use test_generator::test_resources;
use typesmith::*;

// Process test value specified in yaml to interpret special encodings.
pub fn process_value(v: &Value) -> Result<Value> {
    match v {
        Value::String(s) if s.as_ref() == "#undefined" => Ok(Value::Undefined),
        // `null` cannot be told apart from a missing field, so expected nils
        // are written as "#nil".
        Value::String(s) if s.as_ref() == "#nil" => Ok(Value::Null),
        Value::String(s) if s.starts_with("#sym:") => Ok(Value::symbol(&s["#sym:".len()..])),
        Value::String(s) if s.starts_with("#decimal:") => match Number::parse_decimal(&s["#decimal:".len()..]) {
            Some(n) => Ok(Value::from(n)),
            None => bail!("invalid decimal {s}"),
        },
        Value::String(s) if s.starts_with("#date:") => {
            let date = chrono::NaiveDate::parse_from_str(&s["#date:".len()..], "%Y-%m-%d")?;
            Ok(Value::from(date))
        }

        // range! : [start, end]
        Value::Object(fields) if fields.len() == 1 && matches!(&v["range!"], Value::Array(_)) => {
            let bounds = v["range!"].as_array()?;
            match bounds.as_slice() {
                [Value::Number(start), Value::Number(end)] => {
                    Ok(Value::range(start.clone(), end.clone()))
                }
                _ => bail!("range! expects two numbers"),
            }
        }

        Value::Array(items) => {
            let mut array_value = Value::new_array();
            let array = array_value.as_array_mut()?;
            for item in items.iter() {
                array.push(process_value(item)?);
            }
            Ok(array_value)
        }

        Value::Object(fields) => {
            let mut object_value = Value::new_object();
            let object = object_value.as_object_mut()?;
            for (key, value) in fields.iter() {
                object.insert(process_value(key)?, process_value(value)?);
            }
            Ok(object_value)
        }

        _ => Ok(v.clone()),
    }
}

#[derive(Deserialize, Debug)]
struct TestCase {
    note: String,
    #[serde(rename = "type")]
    type_name: String,
    // Ordered `[predicate, operand]` pairs.
    constraints: Option<Vec<(String, Value)>>,
    default: Option<Value>,
    input: Value,
    want_result: Option<Value>,
    want_valid: Option<bool>,
    error: Option<String>,
    skip: Option<bool>,
}

#[derive(Deserialize, Debug)]
struct YamlTest {
    cases: Vec<TestCase>,
}

fn build_type(case: &TestCase) -> Result<Type> {
    let mut t = lookup(&case.type_name)?;
    if let Some(constraints) = &case.constraints {
        let mut options = vec![];
        for (name, operand) in constraints {
            options.push((name.as_str(), process_value(operand)?));
        }
        t = t.constrained(options)?;
    }
    if let Some(default) = &case.default {
        t = t.default(process_value(default)?)?;
    }
    Ok(t)
}

fn run_case(case: &TestCase) -> Result<()> {
    let t = build_type(case)?;
    let input = process_value(&case.input)?;

    if let Some(valid) = case.want_valid {
        if t.is_valid(&input) != valid {
            bail!("expected is_valid to be {valid} for {input}");
        }
    }

    match (t.apply(&input), &case.want_result, &case.error) {
        (Ok(actual), Some(want), None) => {
            let want = process_value(want)?;
            if actual != want {
                bail!("\nleft  = {actual:?}\nright = {want:?}");
            }
        }
        (Err(actual), None, Some(expected)) => {
            let actual = actual.to_string();
            if !actual.contains(expected.as_str()) {
                bail!("Error message\n`{actual}`\ndoes not contain `{expected}`");
            }
        }
        (Ok(actual), None, Some(_)) => bail!("apply succeeded with {actual}"),
        (Err(actual), Some(_), None) => return Err(actual.into()),
        _ => bail!("either want_result or error must be specified in test case."),
    }
    Ok(())
}

fn yaml_test_impl(file: &str) -> Result<()> {
    let yaml_str = std::fs::read_to_string(file)?;
    let test: YamlTest = serde_yaml::from_str(&yaml_str)?;

    println!("running {file}");

    for case in test.cases {
        print!("case {} ", case.note);
        if case.skip == Some(true) {
            println!("skipped");
            continue;
        }
        if let Err(e) = run_case(&case) {
            bail!("case {} failed: {e}", case.note);
        }
        println!("passed");
    }
    Ok(())
}

fn yaml_test(file: &str) -> Result<()> {
    match yaml_test_impl(file) {
        Ok(_) => Ok(()),
        Err(e) => {
            // If Err is returned, it doesn't always get printed by cargo test.
            // Therefore, panic with the error.
            panic!("{}", e);
        }
    }
}

#[test_resources("tests/coercion/cases/*.yaml")]
fn run(path: &str) {
    yaml_test(path).unwrap()
}

#[test]
#[ignore = "intended for running a single yaml file"]
fn one_yaml() -> Result<()> {
    let file = env::args().find(|a| a.ends_with(".yaml"));
    match file {
        Some(file) => yaml_test(&file),
        None => bail!("missing <yaml-file>"),
    }
}
