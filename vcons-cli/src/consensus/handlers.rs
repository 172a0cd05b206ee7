use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use vcons_consensus::{
    AlternatePolicy, EncoderConfig, FrequencyBounds, RegionExclusionFilter, SequenceAssembler,
};
use vcons_core::utils::remove_all_extensions;
use vcons_io::{VcfReader, load_fasta, select_contig};

use super::report::{ReportHeader, write_consensus};

pub fn run_consensus(matches: &ArgMatches) -> Result<()> {
    let vcf_path = matches
        .get_one::<String>("vcf")
        .context("A path to a VCF file is required")?;

    // validate every option before touching the inputs
    let frequency = matches
        .get_one::<String>("af")
        .map(|spec| spec.parse::<FrequencyBounds>())
        .transpose()?;

    let exclude_specs: Vec<&String> = matches
        .get_many::<String>("exclude")
        .map(|specs| specs.collect())
        .unwrap_or_default();
    let filter = RegionExclusionFilter::new(&exclude_specs)?;

    let policy: AlternatePolicy = matches
        .get_one::<String>("alternates")
        .map(|p| p.parse::<AlternatePolicy>())
        .transpose()
        .map_err(anyhow::Error::msg)?
        .unwrap_or_default();

    let config = EncoderConfig {
        invert: matches.get_flag("invert"),
        frequency,
    };
    let assembler = SequenceAssembler::from_config(&config, filter).with_policy(policy);

    let mut chrom = matches.get_one::<String>("chrom").cloned();

    let backbone = match matches.get_one::<String>("reference") {
        Some(fasta_path) => {
            let records = load_fasta(fasta_path)
                .with_context(|| format!("Failed to load reference: {}", fasta_path))?;
            let contig = select_contig(records, chrom.as_deref())?;
            chrom = Some(contig.name.clone());
            Some(contig.sequence)
        }
        None => None,
    };

    let reader =
        VcfReader::open(vcf_path).with_context(|| format!("Failed to open VCF: {}", vcf_path))?;
    info!(
        "Reading {} ({} sample(s))",
        vcf_path,
        reader.header().samples().len()
    );

    let records = reader.filter(|record| match (record, &chrom) {
        (Ok(record), Some(chrom)) => &record.chrom == chrom,
        _ => true,
    });

    let consensus = assembler
        .assemble(records, backbone.as_deref())
        .with_context(|| format!("Failed to read variants from {}", vcf_path))?;

    let header = if matches.get_flag("no-header") {
        None
    } else {
        let name = match matches.get_one::<String>("name") {
            Some(name) => name.clone(),
            None if vcf_path == "-" => "stdin".to_string(),
            None => remove_all_extensions(Path::new(vcf_path)),
        };
        Some(ReportHeader {
            name,
            chrom,
            frequency: config.frequency,
            invert: config.invert,
            excluded: assembler.filter().intervals().to_vec(),
        })
    };

    let line_width = *matches.get_one::<usize>("line-width").unwrap_or(&0);

    match matches.get_one::<String>("output") {
        Some(p) => {
            let file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            let mut out = BufWriter::new(file);
            write_consensus(&mut out, header.as_ref(), &consensus.sequence, line_width)?;
            info!("Output written to {}", p);
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_consensus(&mut out, header.as_ref(), &consensus.sequence, line_width)?;
            out.flush()?;
        }
    }

    Ok(())
}
