//! End-to-end runs: exact database, heuristic evaluation and statistics, plus inspecting how
//! the heuristics sort a single permutation.
use std::{
    fs::File,
    io::{self, BufReader, Write},
    path::Path,
};

use tracing::info;

use crate::{
    config::{DatabaseConfig, DatabaseFormat, RunConfig},
    db::{
        BinaryRecordReader, BinaryRecordWriter, EvaluationReader, EvaluationRow, EvaluationWriter,
        Record, TextRecordReader, TextRecordWriter,
    },
    error::{Error, Result},
    eval::evaluate,
    exact::ExactSolver,
    heuristics::{sort, Heuristic, SortReport},
    perm::{Codec, Permutation},
    problem::Problem,
    stats::{Statistics, SummaryRow},
};

enum DatabaseSink {
    Discard,
    Binary(BinaryRecordWriter<File>),
    Text(TextRecordWriter<File>),
}

impl DatabaseSink {
    fn create(database: Option<&DatabaseConfig>, codec: Codec) -> Result<Self> {
        let Some(database) = database else {
            return Ok(DatabaseSink::Discard);
        };
        let file = File::create(&database.path)?;
        Ok(match database.format {
            DatabaseFormat::Binary => DatabaseSink::Binary(BinaryRecordWriter::new(file, codec)),
            DatabaseFormat::Text => DatabaseSink::Text(TextRecordWriter::new(file, codec)),
        })
    }

    fn write(&mut self, record: Record) -> Result<()> {
        match self {
            DatabaseSink::Discard => Ok(()),
            DatabaseSink::Binary(writer) => writer.write(record),
            DatabaseSink::Text(writer) => writer.write(record),
        }
    }

    fn finish(self) -> Result<()> {
        let file = match self {
            DatabaseSink::Discard => return Ok(()),
            DatabaseSink::Binary(writer) => writer.finish()?,
            DatabaseSink::Text(writer) => writer.finish()?,
        };
        file.sync_all()?;
        Ok(())
    }
}

enum DatabaseSource {
    Binary(BinaryRecordReader<File>),
    Text(TextRecordReader<BufReader<File>>),
}

impl DatabaseSource {
    fn open(database: &DatabaseConfig, codec: Codec) -> Result<Self> {
        let file = File::open(&database.path)?;
        Ok(match database.format {
            DatabaseFormat::Binary => DatabaseSource::Binary(BinaryRecordReader::new(file, codec)),
            DatabaseFormat::Text => {
                DatabaseSource::Text(TextRecordReader::new(BufReader::new(file), codec))
            }
        })
    }
}

impl Iterator for DatabaseSource {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            DatabaseSource::Binary(reader) => reader.next(),
            DatabaseSource::Text(reader) => reader.next(),
        }
    }
}

/// Computes the exact distances of all permutations, storing them when a database is
/// configured.
pub fn build_database(config: &RunConfig, problem: &Problem) -> Result<Vec<Record>> {
    let mut sink = DatabaseSink::create(config.database.as_ref(), problem.codec())?;
    let mut records = vec![];
    ExactSolver::new(problem).try_solve(|code, value| {
        let record = Record { code, value };
        records.push(record);
        sink.write(record)
    })?;
    sink.finish()?;
    Ok(records)
}

/// Reads a database written by [`build_database`].
pub fn load_database(database: &DatabaseConfig, codec: Codec) -> Result<Vec<Record>> {
    DatabaseSource::open(database, codec)?.collect()
}

/// Copies a database into another file, usually changing its format, and returns the number of
/// copied records.
pub fn convert_database(from: &DatabaseConfig, to: &DatabaseConfig, codec: Codec) -> Result<u64> {
    if from.path == to.path {
        return Err(Error::Config(format!(
            "cannot convert {} in place",
            from.path.display()
        )));
    }

    let source = DatabaseSource::open(from, codec)?;
    let mut sink = DatabaseSink::create(Some(to), codec)?;
    let mut records = 0;
    for record in source {
        sink.write(record?)?;
        records += 1;
    }
    sink.finish()?;

    info!(event = "database_converted", records);
    Ok(records)
}

/// Evaluates all heuristics on the given records, using the configured number of threads.
pub fn evaluate_records(
    config: &RunConfig,
    problem: &Problem,
    records: &[Record],
) -> Result<Vec<EvaluationRow>> {
    let rows = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| Error::Config(format!("cannot start evaluation threads: {err}")))?
            .install(|| evaluate(records, problem))?,
        None => evaluate(records, problem)?,
    };

    if let Some(path) = &config.evaluation {
        let mut writer = EvaluationWriter::new(File::create(path)?);
        for row in &rows {
            writer.write(row)?;
        }
        writer.finish()?.flush()?;
    }

    Ok(rows)
}

/// Aggregates the rows of an evaluation file written by [`evaluate_records`].
pub fn summarize_file(
    path: impl AsRef<Path>,
    n: usize,
    signed: bool,
    selection: &[Heuristic],
) -> Result<Vec<SummaryRow>> {
    let mut statistics = Statistics::new(n, signed, selection);
    for row in EvaluationReader::new(File::open(path)?) {
        statistics.add(&row?);
    }
    Ok(statistics.summary())
}

/// Sorts a single permutation with each selected heuristic, all of them if `selection` is empty.
///
/// Reports are ordered by heuristic identifier.
pub fn inspect(pi: &Permutation, selection: &[Heuristic]) -> Result<Vec<(Heuristic, SortReport)>> {
    let problem = Problem::swi_ls(pi.len(), pi.is_signed())?;
    let mut selection = if selection.is_empty() {
        Heuristic::ALL.to_vec()
    } else {
        selection.to_vec()
    };
    selection.sort_unstable();
    selection.dedup();

    Ok(selection
        .into_iter()
        .map(|heuristic| (heuristic, sort(pi, &problem, heuristic)))
        .collect())
}

const RULE: &str = "------------------------------------------------------";

/// Writes the reports of [`inspect`], one block per heuristic separated by horizontal rules.
pub fn write_inspection(
    target: &mut impl Write,
    reports: &[(Heuristic, SortReport)],
) -> io::Result<()> {
    writeln!(target, "{RULE}")?;
    for (heuristic, report) in reports {
        writeln!(target, "{:<13}: {report}", heuristic.name())?;
        writeln!(target, "{RULE}")?;
    }
    Ok(())
}

/// Runs the exact search, the heuristic evaluation and the statistics for a configuration.
pub fn run(config: &RunConfig) -> Result<Vec<SummaryRow>> {
    config.validate()?;
    let problem = config.problem()?;

    let records = build_database(config, &problem)?;
    info!(event = "database_built", records = records.len());

    let rows = evaluate_records(config, &problem, &records)?;

    let mut statistics = Statistics::new(problem.n(), problem.is_signed(), &config.selection());
    for row in &rows {
        statistics.add(row);
    }
    let summary = statistics.summary();
    info!(
        event = "run_end",
        permutations = statistics.permutations(),
        rows = summary.len(),
    );
    Ok(summary)
}
