// =============================================================================
// Sequence geometry
// =============================================================================

/// Length of a codon in base pairs
pub const CODON_LENGTH: usize = 3;

/// Number of distinct codons over the {A, C, G, T} alphabet
pub const CODON_COUNT: usize = 64;

/// SIMD processing chunk size for nucleotide scans
pub const CHUNK_SIZE: usize = 32;

// =============================================================================
// Session limits
// =============================================================================

/// Default number of changes a session may apply before giving up
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

// =============================================================================
// Suggestion priorities
//
// Built-in analyzers compose priorities from integer tiers so that a higher
// tier always dominates every lower one: primary criterion, then a secondary
// tie-break, then codon usage share in per-mille (0..=1000).
// =============================================================================

/// Weight of one motif occurrence eliminated (net, both strands)
pub const MOTIF_ELIMINATION_WEIGHT: i64 = 1_000_000;

/// Penalty per G/C base gained or lost by a motif-removing substitution
pub const MOTIF_GC_SHIFT_PENALTY: i64 = 10_000;

/// Weight of one G/C base moved in the requested direction
pub const GC_STEP_WEIGHT: i64 = 1_000_000;

/// Weight of one repeat instance broken by a substitution
pub const REPEAT_BREAK_WEIGHT: i64 = 1_000_000;

/// Scale turning a codon usage share (0.0..=1.0) into a priority component
pub const USAGE_SHARE_SCALE: f64 = 1000.0;

/// Priority of an identity suggestion reporting a violation nothing can fix
pub const UNRESOLVABLE_PRIORITY: i64 = i64::MIN;

// =============================================================================
// NCBI genetic codes
//
// Amino-acid letters for the 64 codons in T/C/A/G order at each codon position,
// as published in https://ftp.ncbi.nih.gov/entrez/misc/data/gc.prt
// =============================================================================

/// Standard code
pub const GENETIC_CODE_1: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Vertebrate mitochondrial code
pub const GENETIC_CODE_2: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG";
/// Yeast mitochondrial code
pub const GENETIC_CODE_3: &[u8; 64] =
    b"FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Mold, protozoan and coelenterate mitochondrial code; Mycoplasma/Spiroplasma
pub const GENETIC_CODE_4: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Invertebrate mitochondrial code
pub const GENETIC_CODE_5: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG";
/// Ciliate, dasycladacean and hexamita nuclear code
pub const GENETIC_CODE_6: &[u8; 64] =
    b"FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Echinoderm and flatworm mitochondrial code
pub const GENETIC_CODE_9: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG";
/// Euplotid nuclear code
pub const GENETIC_CODE_10: &[u8; 64] =
    b"FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Bacterial, archaeal and plant plastid code
pub const GENETIC_CODE_11: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Alternative yeast nuclear code
pub const GENETIC_CODE_12: &[u8; 64] =
    b"FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Ascidian mitochondrial code
pub const GENETIC_CODE_13: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG";
/// Alternative flatworm mitochondrial code
pub const GENETIC_CODE_14: &[u8; 64] =
    b"FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG";
/// Blepharisma nuclear code
pub const GENETIC_CODE_15: &[u8; 64] =
    b"FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Chlorophycean mitochondrial code
pub const GENETIC_CODE_16: &[u8; 64] =
    b"FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Trematode mitochondrial code
pub const GENETIC_CODE_21: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG";
/// Scenedesmus obliquus mitochondrial code
pub const GENETIC_CODE_22: &[u8; 64] =
    b"FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Thraustochytrium mitochondrial code
pub const GENETIC_CODE_23: &[u8; 64] =
    b"FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
/// Rhabdopleuridae mitochondrial code
pub const GENETIC_CODE_24: &[u8; 64] =
    b"FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG";
/// Candidate division SR1 and gracilibacteria code
pub const GENETIC_CODE_25: &[u8; 64] =
    b"FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG";
