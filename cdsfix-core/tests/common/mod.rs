#![allow(dead_code)]

use cdsfix_core::ChangeRecord;
use cdsfix_core::codon::{CodonTable, CodonUsage};

/// Codon usage per thousand for a methylotrophic yeast expression host
const YEAST_USAGE: [(&str, f64); 64] = [
    ("AAA", 29.9), ("AAC", 26.7), ("AAG", 33.8), ("AAT", 25.1),
    ("ACA", 13.8), ("ACC", 14.5), ("ACG", 6.0), ("ACT", 22.4),
    ("AGA", 20.1), ("AGC", 7.6), ("AGG", 6.6), ("AGT", 12.5),
    ("ATA", 11.1), ("ATC", 19.4), ("ATG", 18.7), ("ATT", 31.1),
    ("CAA", 25.4), ("CAC", 9.1), ("CAG", 16.3), ("CAT", 11.8),
    ("CCA", 18.9), ("CCC", 6.8), ("CCG", 3.9), ("CCT", 15.8),
    ("CGA", 4.2), ("CGC", 2.2), ("CGG", 1.9), ("CGT", 6.9),
    ("CTA", 10.7), ("CTC", 7.6), ("CTG", 14.9), ("CTT", 15.9),
    ("GAA", 37.4), ("GAC", 25.9), ("GAG", 29.0), ("GAT", 35.7),
    ("GCA", 15.1), ("GCC", 16.6), ("GCG", 3.9), ("GCT", 28.9),
    ("GGA", 18.4), ("GGC", 9.4), ("GGG", 9.9), ("GGT", 19.2),
    ("GTA", 9.9), ("GTC", 14.9), ("GTG", 12.3), ("GTT", 26.9),
    ("TAA", 0.8), ("TAC", 18.1), ("TAG", 0.5), ("TAT", 16.0),
    ("TCA", 15.2), ("TCC", 16.5), ("TCG", 7.4), ("TCT", 24.4),
    ("TGA", 0.3), ("TGC", 4.4), ("TGG", 10.3), ("TGT", 7.7),
    ("TTA", 15.6), ("TTC", 20.6), ("TTG", 31.5), ("TTT", 24.1),
];

/// Standard genetic code weighted by [`YEAST_USAGE`]
pub fn yeast_table() -> CodonTable {
    let usage: Vec<CodonUsage> = YEAST_USAGE
        .iter()
        .map(|&(codon, weight)| CodonUsage::new(codon, weight))
        .collect();
    CodonTable::from_genetic_code(1, &usage).expect("usage table covers the standard code")
}

/// BsaI, BsmBI, BbsI and SapI recognition sites
pub const TYPE_IIS_SITES: [&str; 4] = ["GGTCTC", "CGTCTC", "GAAGAC", "GCTCTTC"];

/// Short ORF carrying six TypeIIS sites, two of them on the reverse strand
pub fn type_iis_gene() -> String {
    [
        "ATG", "AAA", "GGTCTC", "GCTGAA", "CGAGACGCT", "AAA", "GAAGAC", "CTG", "AAGCTCTTC",
        "GCT", "GAGACC", "AAA", "CGTCTC", "TAA",
    ]
    .concat()
}

pub const TYPE_IIS_PROTEIN: &str = "MKGLAERDAKEDLKLFAETKRL*";

/// 21 bases of coding sequence duplicated in frame
pub const DUPLICATED_SEGMENT: &str = "GATGAAAAACTGCCGTTTGGT";

/// ORF with [`DUPLICATED_SEGMENT`] twice, separated by one Ala codon
pub fn duplicated_gene() -> String {
    format!("ATG{DUPLICATED_SEGMENT}GCT{DUPLICATED_SEGMENT}TAA")
}

/// Every state a session passed through, starting with `initial`
pub fn replay(initial: &str, changes: &[ChangeRecord]) -> Vec<String> {
    let mut states = vec![initial.to_ascii_uppercase()];
    for change in changes {
        let mut next = states[states.len() - 1].clone();
        let end = change.position + change.from.len();
        assert_eq!(&next[change.position..end], change.from);
        next.replace_range(change.position..end, &change.to);
        states.push(next);
    }
    states
}
