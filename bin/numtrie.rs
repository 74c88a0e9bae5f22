use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use numtrie::numeric::{prefix_code, split_sortable_range, NumericKind, NumericValue};
use numtrie::{DocNo, NumericFieldConfig, NumericFieldReader, NumericRangeQuery, DEFAULT_PRECISION_STEP};
use serde::Serialize;
use tracing::info;

#[derive(Parser)]
#[command(name = "numtrie")]
#[command(about = "Numeric trie range decomposition and queries", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the trie sub-ranges covering a range
    Split(RangeArgs),

    /// Index values into an in-memory field and run a range over them
    Query {
        #[command(flatten)]
        range: RangeArgs,

        /// Comma-separated values; a value's position is its document number
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        values: Vec<String>,

        /// Precision step used to index the values (defaults to the query's)
        #[arg(long, env = "NUMTRIE_INDEX_PRECISION_STEP")]
        index_precision_step: Option<u32>,
    },
}

#[derive(ClapArgs)]
struct RangeArgs {
    /// Field name
    #[arg(long, default_value = "value")]
    field: String,

    /// Numeric kind (int, long, float, double)
    #[arg(long, default_value = "long")]
    kind: NumericKind,

    /// Bits stripped per trie level
    #[arg(long, env = "NUMTRIE_PRECISION_STEP", default_value_t = DEFAULT_PRECISION_STEP)]
    precision_step: u32,

    /// Lower bound (unbounded if omitted)
    #[arg(long, allow_hyphen_values = true)]
    min: Option<String>,

    /// Upper bound (unbounded if omitted)
    #[arg(long, allow_hyphen_values = true)]
    max: Option<String>,

    /// Exclude the lower bound
    #[arg(long)]
    exclude_min: bool,

    /// Exclude the upper bound
    #[arg(long)]
    exclude_max: bool,
}

impl RangeArgs {
    fn to_query(&self) -> Result<NumericRangeQuery> {
        let parse = |bound: &Option<String>| -> Result<Option<NumericValue>> {
            bound
                .as_deref()
                .map(|s| self.kind.parse_value(s))
                .transpose()
                .map_err(Into::into)
        };

        let query = NumericRangeQuery::new(
            self.field.clone(),
            self.kind,
            self.precision_step,
            parse(&self.min)?,
            parse(&self.max)?,
            !self.exclude_min,
            !self.exclude_max,
        )?;
        Ok(query)
    }
}

#[derive(Serialize)]
struct SplitEntry {
    shift: u32,
    min: String,
    max: String,
    lower_term: String,
    upper_term: String,
}

#[derive(Serialize)]
struct SplitOutput {
    query: String,
    sub_ranges: Vec<SplitEntry>,
}

#[derive(Serialize)]
struct QueryMatch {
    doc: u32,
    value: String,
}

#[derive(Serialize)]
struct QueryOutput {
    query: String,
    total: u64,
    matches: Vec<QueryMatch>,
}

fn hex(term: &[u8]) -> String {
    term.iter().map(|b| format!("{:02x}", b)).collect()
}

fn run_split(range: &RangeArgs) -> Result<SplitOutput> {
    let query = range.to_query()?;
    let kind = query.kind();

    let mut sub_ranges = Vec::new();
    if let Some((low, high)) = query.sortable_range() {
        split_sortable_range(kind, low, high, query.precision_step(), |min, max, shift| {
            sub_ranges.push(SplitEntry {
                shift,
                min: NumericValue::from_sortable(kind, min).to_string(),
                max: NumericValue::from_sortable(kind, max).to_string(),
                lower_term: hex(&prefix_code(kind, min, shift)),
                upper_term: hex(&prefix_code(kind, max, shift)),
            });
        });
    }

    info!(query = %query, sub_ranges = sub_ranges.len(), "split range");
    Ok(SplitOutput {
        query: query.to_string(),
        sub_ranges,
    })
}

fn run_query(range: &RangeArgs, values: &[String], index_step: Option<u32>) -> Result<QueryOutput> {
    let query = range.to_query()?;

    let parsed = values
        .iter()
        .map(|s| query.kind().parse_value(s))
        .collect::<numtrie::Result<Vec<_>>>()
        .context("failed to parse --values")?;

    let config = NumericFieldConfig::new(query.kind())
        .with_precision_step(index_step.unwrap_or(query.precision_step()));
    let reader = NumericFieldReader::from_values(
        query.field(),
        config,
        parsed.iter().enumerate().map(|(i, v)| (DocNo(i as u32), *v)),
    )?;

    let docs = query.execute(&reader)?;
    info!(query = %query, total = docs.len(), "executed range");

    let matches = docs
        .iter()
        .map(|doc| QueryMatch {
            doc,
            value: parsed[doc as usize].to_string(),
        })
        .collect();

    Ok(QueryOutput {
        query: query.to_string(),
        total: docs.len(),
        matches,
    })
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let output = match &args.command {
        Command::Split(range) => serde_json::to_string_pretty(&run_split(range)?)?,
        Command::Query {
            range,
            values,
            index_precision_step,
        } => serde_json::to_string_pretty(&run_query(range, values, *index_precision_step)?)?,
    };
    println!("{}", output);

    Ok(())
}
