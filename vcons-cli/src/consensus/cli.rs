use clap::{Arg, ArgAction, Command};

pub const CONSENSUS_CMD: &str = "consensus";

pub fn create_consensus_cli() -> Command {
    Command::new(CONSENSUS_CMD)
        .about("Build a consensus sequence from a VCF, writing heterozygous calls as IUPAC ambiguity codes.")
        .arg(
            Arg::new("vcf")
                .long("vcf")
                .required(true)
                .help("Input VCF file (.vcf, .vcf.gz or '-' for stdin)"),
        )
        .arg(
            Arg::new("reference")
                .long("reference")
                .short('r')
                .required(false)
                .help("Reference FASTA to overlay variants on (default: emit variants only)"),
        )
        .arg(
            Arg::new("chrom")
                .long("chrom")
                .required(false)
                .help("Only use records on this contig; also selects the reference contig (default: first contig)"),
        )
        .arg(
            Arg::new("af")
                .long("af")
                .required(false)
                .value_name("LOWER-UPPER")
                .help("Only encode records whose AF lies within LOWER-UPPER, e.g. 0.2-0.8"),
        )
        .arg(
            Arg::new("invert")
                .long("invert")
                .action(ArgAction::SetTrue)
                .help("Complement every encoded symbol"),
        )
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .short('x')
                .required(false)
                .num_args(1..)
                .action(ArgAction::Append)
                .value_name("POS|START-END")
                .help("0-based reference positions that keep their reference allele"),
        )
        .arg(
            Arg::new("alternates")
                .long("alternates")
                .required(false)
                .default_value("first")
                .value_parser(["first", "merge"])
                .help("How to encode records with several ALT alleles"),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .required(false)
                .help("Sequence name in the header line (default: VCF file name)"),
        )
        .arg(
            Arg::new("no-header")
                .long("no-header")
                .action(ArgAction::SetTrue)
                .help("Write only the sequence, without a header line"),
        )
        .arg(
            Arg::new("line-width")
                .long("line-width")
                .required(false)
                .default_value("0")
                .value_parser(clap::value_parser!(usize))
                .help("Wrap the sequence at this many bases per line (0: no wrapping)"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .required(false)
                .help("Output file (default: stdout)"),
        )
}
