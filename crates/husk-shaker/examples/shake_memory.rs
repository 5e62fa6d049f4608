//! Shaking an in-memory artifact.
//!
//! This example demonstrates:
//! - Serving a compiled unit from a `MemoryArtifactStore`
//! - Shaking it into any `Write` sink
//! - Reading the report and the per-element analysis

use husk_shaker::{MemoryArtifactStore, TreeShaker, UnitId};

const APP: &str = r#"function $inherits(sub, sup){ sub.prototype = Object.create(sup.prototype); }
function Shape(){}
Shape.prototype.area = function(){ return 0; };
Shape.prototype.describe = function(){ return "shape"; };
function Square(s){ this.s = s; }
$inherits(Square, Shape);
Square.prototype.area = function(){ return this.s * this.s; };
function Unused(){}
function main(){ console.log(new Square(2).area()); }
RunEntry(main);"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let unit = UnitId::new("app");
    let store = MemoryArtifactStore::new().with_artifact(unit.clone(), "js", APP);

    let shaker = TreeShaker::default();
    let mut shaken: Vec<u8> = Vec::new();
    let report = shaker.shake(&store, &unit, "js", &mut shaken)?;

    println!("{}", String::from_utf8(shaken)?);
    println!(
        "kept {} items, removed {}: {:?}",
        report.items_kept, report.items_removed, report.removed
    );

    if let Some(analysis) = shaker.analyze(APP) {
        for element in analysis.unreachable() {
            println!("unreachable: {}", element.qualified_name);
        }
    }

    Ok(())
}
