// ==============================================================================
// models.rs - Genemap Data Models
// ==============================================================================
// Description: Data structures for parsed OMIM genemap2 records
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};

/// OMIM phenotype-to-gene mapping key
///
/// Categorical confidence indicator for how a phenotype was mapped to a gene:
/// - 1: the disorder was mapped by association with the gene's locus
/// - 2: the disorder was mapped by linkage, no mutation found
/// - 3: the molecular basis of the disorder is known
/// - 4: a chromosomal deletion/duplication syndrome involving the gene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MappingKey {
    /// Mapped by association with the gene's locus (1)
    Association,
    /// Mapped by linkage, molecular basis unknown (2)
    Linkage,
    /// Molecular basis of the disorder is known (3)
    MolecularBasisKnown,
    /// Chromosomal deletion or duplication syndrome (4)
    DeletionDuplication,
}

impl MappingKey {
    /// Map an OMIM mapping-key digit (1-4) to its variant
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(MappingKey::Association),
            2 => Some(MappingKey::Linkage),
            3 => Some(MappingKey::MolecularBasisKnown),
            4 => Some(MappingKey::DeletionDuplication),
            _ => None,
        }
    }

    /// The source-format digit for this key
    pub fn as_digit(&self) -> u8 {
        match self {
            MappingKey::Association => 1,
            MappingKey::Linkage => 2,
            MappingKey::MolecularBasisKnown => 3,
            MappingKey::DeletionDuplication => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MappingKey::Association => "Association",
            MappingKey::Linkage => "Linkage",
            MappingKey::MolecularBasisKnown => "MolecularBasisKnown",
            MappingKey::DeletionDuplication => "DeletionDuplication",
        }
    }
}

/// One phenotype association within a gene record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeEntry {
    /// Phenotype name with source confidence punctuation stripped
    pub name: String,

    /// Six-digit phenotype MIM number, absent for unnumbered phenotypes
    pub mim_number: Option<String>,

    /// Mapping-confidence key (1-4)
    pub mapping_key: MappingKey,

    /// Inheritance modes (e.g., "Autosomal dominant"); empty when the
    /// source substring carries none
    pub inheritances: Vec<String>,
}

/// One gene and its associated phenotype annotations
///
/// Positions and identifiers are kept as strings; the genemap2 export is not
/// guaranteed numeric-clean and the parser does not coerce field contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneRecord {
    /// Chromosome (e.g., "chr1", "chrX")
    pub chromosome: String,

    /// Genomic position start (bp)
    pub genomic_position_start: String,

    /// Genomic position end (bp)
    pub genomic_position_end: String,

    /// Cytogenetic location from OMIM (e.g., "1p36.33")
    pub cyto_location: String,

    /// Computed cytogenetic location (NCBI)
    pub computed_cyto_location: String,

    /// Gene MIM number; row identity, unique per file
    pub mim_number: String,

    /// Comma-separated gene symbols
    pub gene_symbols: String,

    /// Full gene name
    pub gene_name: String,

    /// HGNC-approved gene symbol
    pub approved_gene_symbol: String,

    /// Entrez gene ID
    pub entrez_gene_id: String,

    /// Ensembl gene ID
    pub ensembl_gene_id: String,

    /// Free-text comments column
    pub comments: String,

    /// Mouse gene symbol/ID (MGI)
    pub mouse_gene_id: String,

    /// Phenotype associations, in source order; legitimately empty for a
    /// gene with no known phenotype
    pub phenotypes: Vec<PhenotypeEntry>,
}

/// Why a data row was dropped instead of producing a record
///
/// Row-level anomalies are a tolerance policy, not errors: the export is a
/// third-party artifact known to contain occasional inconsistent rows. The
/// reason is surfaced for logging and tests, never propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiscardReason {
    /// Fewer than the expected number of tab-delimited columns
    TooFewColumns,
    /// MIM number column empty after trimming
    EmptyMimNumber,
    /// Gene symbols column empty after trimming
    EmptyGeneSymbols,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::TooFewColumns => "TooFewColumns",
            DiscardReason::EmptyMimNumber => "EmptyMimNumber",
            DiscardReason::EmptyGeneSymbols => "EmptyGeneSymbols",
        }
    }
}
