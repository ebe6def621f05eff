mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use config::{ConfigMerger, MergedEdit, SchemaOverrides};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use xmlrec_core::adapters::{FsCatalogSource, FsWritePort};
use xmlrec_core::pipeline::{run_schema, write_schema_artifacts};
use xmlrec_core::session::{EditSession, build_resolver};
use xmlrec_core::{CancelFlag, Edit};
use xmlrec_edit::{EditError, RecordSlot};
use xmlrec_render::{render_document_md, render_record_md, render_resolution};
use xmlrec_schema::AggregateError;
use xmlrec_types::FileType;

#[derive(Debug, Parser)]
#[command(
    name = "xmlrec",
    version,
    about = "Descriptor-driven editor and schema aggregator for flat XML record files."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Directory holding xmlrec.toml; relative config paths start here.
    #[arg(long, global = true, default_value = ".")]
    root: Utf8PathBuf,

    /// Descriptor catalog file (overrides [descriptors] path).
    #[arg(long, global = true)]
    descriptors: Option<Utf8PathBuf>,

    /// Fallback title keys, comma separated (overrides [titles] fallback).
    #[arg(long, global = true, value_delimiter = ',')]
    title_fallback: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every slot of a document with its title and description.
    List(FileArgs),
    /// Show the attributes of one record.
    Show(ShowArgs),
    /// Edit one attribute value or key and save.
    Set(SetArgs),
    /// Find the next record whose title or description contains a string.
    Search(SearchArgs),
    /// Resolve an attribute/value pair for a file type.
    Resolve(ResolveArgs),
    /// Aggregate the attribute schema of every document under a directory.
    Schema(SchemaArgs),
}

#[derive(Debug, Parser)]
struct FileArgs {
    file: Utf8PathBuf,
}

#[derive(Debug, Parser)]
struct ShowArgs {
    file: Utf8PathBuf,
    /// Slot index as printed by `list`.
    slot: usize,
}

#[derive(Debug, Parser)]
#[command(group(clap::ArgGroup::new("edit").required(true).args(["value", "attr"])))]
struct SetArgs {
    file: Utf8PathBuf,
    slot: usize,
    /// Attribute index within the record, as printed by `show`.
    entry: usize,

    /// New raw value; the attribute key is kept.
    #[arg(long)]
    value: Option<String>,

    /// New attribute key; the value is kept.
    #[arg(long)]
    attr: Option<String>,

    /// Write to this path instead of the input file.
    #[arg(long)]
    out: Option<Utf8PathBuf>,

    /// Print a diff of the change instead of saving.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Debug, Parser)]
struct SearchArgs {
    file: Utf8PathBuf,
    needle: String,

    /// Start after this slot (default: from the beginning).
    #[arg(long)]
    from: Option<usize>,
}

#[derive(Debug, Parser)]
struct ResolveArgs {
    file_type: String,
    attr: String,
    value: String,
}

#[derive(Debug, Parser)]
struct SchemaArgs {
    /// Directory to scan (default: [scan] root, then --root).
    #[arg(long)]
    scan_root: Option<Utf8PathBuf>,

    /// Directory for Schema.json (default: [schema] out_dir, then the scan root).
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// File extension to scan, without the dot.
    #[arg(long)]
    extension: Option<String>,

    /// Report malformed files and keep going instead of aborting.
    #[arg(long, default_value_t = false)]
    skip_malformed: bool,

    /// Print the JSON to stdout instead of writing a file.
    #[arg(long, default_value_t = false)]
    print: bool,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let file_config = config::load_or_default(&cli.global.root)
        .with_context(|| format!("load {} config", config::CONFIG_FILE_NAME))?;
    let merger = ConfigMerger::new(file_config, &cli.global.root);

    match cli.cmd {
        Command::List(args) => cmd_list(&edit_config(&merger, &cli.global), args),
        Command::Show(args) => cmd_show(&edit_config(&merger, &cli.global), args),
        Command::Set(args) => cmd_set(&edit_config(&merger, &cli.global), args),
        Command::Search(args) => cmd_search(&edit_config(&merger, &cli.global), args),
        Command::Resolve(args) => cmd_resolve(&edit_config(&merger, &cli.global), args),
        Command::Schema(args) => cmd_schema(&merger, args),
    }
}

fn edit_config(merger: &ConfigMerger, global: &GlobalArgs) -> MergedEdit {
    let merged = merger.merge_edit_args(global.descriptors.as_deref(), &global.title_fallback);
    debug!(
        "merged config: catalog={:?}, title_fallback={:?}, record_element={}",
        merged.catalog_path, merged.settings.title_fallback, merged.settings.record_element
    );
    merged
}

fn open(merged: &MergedEdit, file: &Utf8Path) -> anyhow::Result<EditSession> {
    let catalog = FsCatalogSource::new(merged.catalog_path.clone());
    EditSession::open(file, &merged.settings, &catalog)
}

fn cmd_list(merged: &MergedEdit, args: FileArgs) -> anyhow::Result<ExitCode> {
    let session = open(merged, &args.file)?;
    print!("{}", render_document_md(session.document()));
    Ok(ExitCode::SUCCESS)
}

fn cmd_show(merged: &MergedEdit, args: ShowArgs) -> anyhow::Result<ExitCode> {
    let session = open(merged, &args.file)?;
    let doc = session.document();
    let record = match doc.slot(args.slot) {
        Some(RecordSlot::Record(r)) => r,
        Some(RecordSlot::Passthrough(_)) => {
            return Err(EditError::NotARecord { index: args.slot }.into());
        }
        None => {
            return Err(EditError::SlotOutOfRange {
                index: args.slot,
                len: doc.slots().len(),
            }
            .into());
        }
    };
    print!("{}", render_record_md(args.slot, record));
    Ok(ExitCode::SUCCESS)
}

fn cmd_set(merged: &MergedEdit, args: SetArgs) -> anyhow::Result<ExitCode> {
    let mut session = open(merged, &args.file)?;
    let edit = match (&args.value, &args.attr) {
        (Some(v), _) => Edit::Value(v),
        (None, Some(a)) => Edit::Attr(a),
        (None, None) => anyhow::bail!("one of --value or --attr is required"),
    };

    if args.dry_run {
        let diff = session
            .preview(args.slot, args.entry, edit)
            .with_context(|| format!("preview edit of {}", args.file))?;
        if diff.is_empty() {
            println!("no change");
        } else {
            print!("{}", diff);
        }
        return Ok(ExitCode::SUCCESS);
    }

    let changed = session
        .set(args.slot, args.entry, edit)
        .with_context(|| format!("edit {}", args.file))?;
    if !changed && args.out.is_none() {
        info!(path = %args.file, "edit is a no-op; file left untouched");
        println!("no change");
        return Ok(ExitCode::SUCCESS);
    }

    let saved = session
        .save(args.out.as_deref())
        .with_context(|| format!("save {}", args.file))?;
    info!("wrote {}", saved);
    println!("saved {}", saved);
    Ok(ExitCode::SUCCESS)
}

fn cmd_search(merged: &MergedEdit, args: SearchArgs) -> anyhow::Result<ExitCode> {
    let session = open(merged, &args.file)?;
    let doc = session.document();
    match doc.search(args.from, &args.needle) {
        Some(index) => {
            let slot = doc.slot(index);
            let title = slot.and_then(RecordSlot::title).unwrap_or("");
            match slot.and_then(RecordSlot::description) {
                Some(desc) => println!("{}\t{}\t{}", index, title, desc),
                None => println!("{}\t{}", index, title),
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            println!("not found");
            Ok(ExitCode::from(1))
        }
    }
}

fn cmd_resolve(merged: &MergedEdit, args: ResolveArgs) -> anyhow::Result<ExitCode> {
    let catalog = FsCatalogSource::new(merged.catalog_path.clone());
    let resolver = build_resolver(&merged.settings, &catalog)?;
    let res = resolver.resolve(&FileType::new(args.file_type), &args.attr, &args.value);
    println!("{}", render_resolution(&res));
    Ok(ExitCode::SUCCESS)
}

fn cmd_schema(merger: &ConfigMerger, args: SchemaArgs) -> anyhow::Result<ExitCode> {
    let settings = merger.merge_schema_args(&SchemaOverrides {
        scan_root: args.scan_root,
        out_dir: args.out_dir,
        extension: args.extension,
        skip_malformed: args.skip_malformed,
    });
    debug!(
        "merged config: scan_root={}, extension={}, skip_malformed={}, destination={}",
        settings.scan_root,
        settings.extension,
        settings.skip_malformed,
        settings.destination()
    );

    let outcome = run_schema(&settings, &CancelFlag::new())
        .with_context(|| format!("aggregate schema under {}", settings.scan_root))?;
    for skipped in &outcome.aggregate.skipped {
        eprintln!("skipped {}: {}", skipped.path, skipped.reason);
    }

    if args.print {
        println!("{}", outcome.json);
        return Ok(ExitCode::SUCCESS);
    }

    let dest = settings.destination();
    write_schema_artifacts(&outcome, &dest, &FsWritePort)?;
    println!(
        "wrote {} ({} tables from {} files)",
        dest,
        outcome.aggregate.entries.len(),
        outcome.aggregate.files_scanned
    );
    Ok(ExitCode::SUCCESS)
}

/// Malformed input exits 2; everything else 1.
fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<EditError>() {
            return e.exit_code();
        }
        if let Some(AggregateError::Parse { .. }) = cause.downcast_ref::<AggregateError>() {
            return 2;
        }
    }
    1
}
