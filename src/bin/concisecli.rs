use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::str::FromStr;

use concise_rs::ConciseSet;
use structopt::StructOpt;

#[derive(Debug, Clone, Copy)]
enum Op {
    Union,
    Intersection,
    Difference,
    SymmetricDifference,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "union" => Ok(Op::Union),
            "intersection" => Ok(Op::Intersection),
            "difference" => Ok(Op::Difference),
            "symmetric-difference" => Ok(Op::SymmetricDifference),
            other => Err(format!("unknown operation {other:?}")),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Op::Union => "union",
            Op::Intersection => "intersection",
            Op::Difference => "difference",
            Op::SymmetricDifference => "symmetric-difference",
        };
        f.write_str(name)
    }
}

#[derive(StructOpt)]
struct ConciseCliParams {
    /// Whitespace-separated integers, or "-" for stdin.
    input: PathBuf,

    /// A second operand; required unless --stats is given alone.
    second: Option<PathBuf>,

    #[structopt(long, default_value = "union")]
    op: Op,

    #[structopt(long)]
    wah: bool,

    /// Print compression statistics instead of the resulting elements.
    #[structopt(long)]
    stats: bool,
}

fn read_values(path: &PathBuf) -> Vec<i32> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).unwrap();
        buf
    } else {
        fs::read_to_string(path).unwrap()
    };
    text.split_whitespace()
        .map(|tok| tok.parse().expect("expected an integer"))
        .collect()
}

fn build(values: Vec<i32>, wah: bool) -> ConciseSet {
    let mut set = if wah { ConciseSet::new_wah() } else { ConciseSet::new() };
    for v in values {
        set.insert(v).unwrap();
    }
    set
}

fn print_stats(label: &str, set: &ConciseSet) {
    println!(
        "{label}: {} elements, bitmap ratio {:.4}, collection ratio {:.4}",
        set.len(),
        set.bitmap_compression_ratio(),
        set.collection_compression_ratio(),
    );
}

fn main() {
    let params = ConciseCliParams::from_args();
    let a = build(read_values(&params.input), params.wah);

    let result = match &params.second {
        Some(second) => {
            let b = build(read_values(second), params.wah);
            if params.stats {
                print_stats("a", &a);
                print_stats("b", &b);
            }
            match params.op {
                Op::Union => a.union(&b),
                Op::Intersection => a.intersection(&b),
                Op::Difference => a.difference(&b),
                Op::SymmetricDifference => a.symmetric_difference(&b),
            }
        }
        None => a,
    };

    if params.stats {
        print_stats(&params.op.to_string(), &result);
    } else {
        for value in result.iter() {
            println!("{}", value.unwrap());
        }
    }
}
