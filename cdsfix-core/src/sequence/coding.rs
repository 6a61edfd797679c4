use crate::codon::CodonTable;
use crate::constants::CODON_LENGTH;
use crate::sequence::normalize;
use crate::types::InputError;

/// One codon of a coding sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodonSlot {
    /// Nucleotide offset of the codon's first base
    pub position: usize,
    /// Amino acid the codon encodes
    pub amino_acid: char,
}

/// A protein-coding sequence segmented into codon slots.
///
/// The translated protein is fixed at construction: later commits replace
/// nucleotides only, and the session guarantees they keep every slot's amino
/// acid.
///
/// # Examples
///
/// ```rust
/// use cdsfix_core::codon::CodonTable;
/// use cdsfix_core::sequence::CodingSequence;
///
/// let table = CodonTable::uniform(1)?;
/// let sequence = CodingSequence::new("atgtattga", &table)?;
///
/// assert_eq!(sequence.as_str(), "ATGTATTGA");
/// assert_eq!(sequence.protein(), "MY*");
/// assert_eq!(sequence.codon(1), Some("TAT"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingSequence {
    nucleotides: String,
    slots: Vec<CodonSlot>,
}

impl CodingSequence {
    /// Normalize, validate and segment `sequence` against `codon_table`.
    ///
    /// # Errors
    ///
    /// [`InputError`] when the sequence is not a whole number of {A, C, G, T} codons.
    pub fn new(sequence: &str, codon_table: &CodonTable) -> Result<Self, InputError> {
        let nucleotides = normalize(sequence)?;

        let slots = nucleotides
            .as_bytes()
            .chunks_exact(CODON_LENGTH)
            .enumerate()
            .map(|(index, codon)| {
                let position = index * CODON_LENGTH;
                codon_table
                    .amino_acid_of(codon)
                    .map(|amino_acid| CodonSlot {
                        position,
                        amino_acid,
                    })
                    .ok_or(InputError::InvalidNucleotide {
                        position,
                        found: char::from(codon[0]),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nucleotides, slots })
    }

    pub fn as_str(&self) -> &str {
        &self.nucleotides
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.nucleotides.as_bytes()
    }

    /// Length in nucleotides
    pub fn len(&self) -> usize {
        self.nucleotides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nucleotides.is_empty()
    }

    pub fn slots(&self) -> &[CodonSlot] {
        &self.slots
    }

    /// Codon in slot `index`
    pub fn codon(&self, index: usize) -> Option<&str> {
        let start = index.checked_mul(CODON_LENGTH)?;
        self.nucleotides.get(start..start.checked_add(CODON_LENGTH)?)
    }

    /// Iterate `(slot, codon)` pairs in sequence order
    pub fn codons(&self) -> impl Iterator<Item = (CodonSlot, &str)> + '_ {
        self.slots.iter().map(|slot| {
            let end = slot.position + CODON_LENGTH;
            (*slot, &self.nucleotides[slot.position..end])
        })
    }

    /// The protein encoded at construction time
    pub fn protein(&self) -> String {
        self.slots.iter().map(|slot| slot.amino_acid).collect()
    }

    /// Copy of the current nucleotides with `length` bases at `position`
    /// replaced by `replacement`.
    ///
    /// Callers validate the range first; an out-of-range splice returns `None`.
    pub fn splice(&self, position: usize, length: usize, replacement: &str) -> Option<String> {
        let end = position.checked_add(length)?;
        let head = self.nucleotides.get(..position)?;
        let tail = self.nucleotides.get(end..)?;

        let mut candidate = String::with_capacity(head.len() + replacement.len() + tail.len());
        candidate.push_str(head);
        candidate.push_str(replacement);
        candidate.push_str(tail);
        Some(candidate)
    }

    /// Replace the nucleotides with an already validated synonymous state
    pub(crate) fn commit(&mut self, nucleotides: String) {
        debug_assert_eq!(nucleotides.len(), self.nucleotides.len());
        self.nucleotides = nucleotides;
    }

    pub fn into_string(self) -> String {
        self.nucleotides
    }
}
