//! Demonstration tasks bundled as the `demo` module

use crate::registry::{CliTask, TaskRegistry};
use anyhow::{ensure, Context};
use jobtools::{string_enum, DeclaredType, NestedNamespace, Signature, Task};
use serde_json::{json, Value};

pub const DEMO_MODULE: &str = "demo";

string_enum! {
    /// How two results are ranked
    pub enum CompareStrategy {
        BiggerBetter => "Bigger is better",
        SmallerBetter => "Smaller is better",
    }
}

/// Registry holding every bundled task
pub fn builtin_registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    registry
        .register(DEMO_MODULE, print_task())
        .register(DEMO_MODULE, types_task())
        .register(DEMO_MODULE, lists_task());
    registry
}

/// `print --name <str> --params <file>`: greets, returns `value1 + value2`
pub fn print_task() -> CliTask {
    Task::new(
        Signature::new("print")
            .param("name", DeclaredType::String)
            .param("params", DeclaredType::Namespace),
        |args| {
            let name = args.fetch::<String>("name")?;
            let params = args.fetch::<NestedNamespace>("params")?;

            let value = |path: &str| {
                params
                    .get_i64(path)
                    .with_context(|| format!("params has no integer '{path}'"))
            };
            let sum = value("value1")? + value("value2")?;
            if params.contains_key("group1") {
                let grouped = value("group1.value1")? + value("group1.value2")?;
                ensure!(
                    sum == grouped,
                    "top-level sum {sum} differs from group1 sum {grouped}"
                );
            }

            println!("Name is {name}");
            Ok(json!(sum))
        },
    )
}

/// `types`: checks that every built-in coercion produced the declared type
pub fn types_task() -> CliTask {
    Task::new(
        Signature::new("types")
            .param("integer", DeclaredType::Integer)
            .param("decimal", DeclaredType::Float)
            .param(
                "compare_strategy",
                DeclaredType::enumeration::<CompareStrategy>(),
            )
            .optional("flag", DeclaredType::Boolean, false),
        |args| {
            let integer = args.fetch::<i64>("integer")?;
            let decimal = args.fetch::<f64>("decimal")?;
            let strategy = args.fetch::<CompareStrategy>("compare_strategy")?;
            let flag = args.fetch::<bool>("flag")?;

            ensure!(
                decimal.fract() != 0.0,
                "decimal {decimal} has no fractional part"
            );
            println!("integer={integer} decimal={decimal} compare_strategy={strategy} flag={flag}");
            Ok(Value::Null)
        },
    )
}

/// `lists --lists <a,b,...>`: returns the number of items
pub fn lists_task() -> CliTask {
    Task::new(
        Signature::new("lists").param("lists", DeclaredType::List),
        |args| {
            let items = args.fetch::<Vec<String>>("lists")?;
            Ok(json!(items.len()))
        },
    )
}
