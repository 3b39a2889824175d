// ==============================================================================
// genemap2.rs - OMIM genemap2.txt Parser
// ==============================================================================
// Description: Parser for the OMIM genemap2 gene/phenotype annotation export
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================
// Format: Tab-delimited text with header comments, 14 columns per data row
// Example:
//   # Chromosome    Genomic Position Start    ...    Phenotypes    Mouse Gene Symbol/ID
//   chr1    2160133    2241652    1p36.33    1p36.33    601628    SKI    SKI proto-oncogene    SKI    6497    ENSG00000157933        Shprintzen-Goldberg syndrome, 182212 (3), Autosomal dominant    Ski (MGI:98310)
// ==============================================================================
// Phenotype column grammar: substrings separated by ';', each one of
//   Name, 600100 (3), Autosomal dominant, Autosomal recessive
//   Name (3), Autosomal dominant
// Phenotype names may carry confidence punctuation: {..} susceptibility,
// [..] nondisease, leading '?' provisional. Stripped during normalization.
// ==============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::models::{DiscardReason, GeneRecord, MappingKey, PhenotypeEntry};

/// Column positions of the genemap2.txt export
///
/// Positional indices are confined to this mapping so the assembler reads as
/// named fields rather than magic numbers.
pub mod columns {
    pub const CHROMOSOME: usize = 0;
    pub const GENOMIC_POSITION_START: usize = 1;
    pub const GENOMIC_POSITION_END: usize = 2;
    pub const CYTO_LOCATION: usize = 3;
    pub const COMPUTED_CYTO_LOCATION: usize = 4;
    pub const MIM_NUMBER: usize = 5;
    pub const GENE_SYMBOLS: usize = 6;
    pub const GENE_NAME: usize = 7;
    pub const APPROVED_GENE_SYMBOL: usize = 8;
    pub const ENTREZ_GENE_ID: usize = 9;
    pub const ENSEMBL_GENE_ID: usize = 10;
    pub const COMMENTS: usize = 11;
    pub const PHENOTYPES: usize = 12;
    pub const MOUSE_GENE_ID: usize = 13;

    /// Rows with fewer columns are skipped, not errored
    pub const MIN_COLUMNS: usize = 14;
}

/// Comment/header marker; such lines never reach the assembler
const COMMENT_MARKER: char = '#';

/// Separator between phenotype substrings within the phenotype column
const PHENOTYPE_SEPARATOR: char = ';';

/// Separator between inheritance modes within one phenotype substring
const INHERITANCE_SEPARATOR: &str = ", ";

/// Errors that can occur during genemap2 file parsing
///
/// Only file-level failures are errors; row-level anomalies are tolerated
/// and recorded as [`DiscardReason`]s instead.
#[derive(Error, Debug)]
pub enum Genemap2ParseError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Parse result: accepted records plus the reasons rows were dropped
///
/// The discard list exists for run statistics and tests; an empty record
/// set is a legitimate outcome, not an error.
#[derive(Debug, Clone)]
pub struct Genemap2Dataset {
    /// Accepted gene records, in source order
    pub records: Vec<GeneRecord>,

    /// One entry per dropped data row
    pub discarded: Vec<DiscardReason>,
}

/// Parser for OMIM genemap2.txt files
#[derive(Debug)]
pub struct Genemap2Parser {
    // `Name, 600100 (3)` optionally followed by `, mode[, mode...]`
    numbered_phenotype: Regex,
    // `Name (3)` optionally followed by `, mode[, mode...]`
    bare_phenotype: Regex,
}

impl Default for Genemap2Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Genemap2Parser {
    pub fn new() -> Self {
        // Both patterns anchor the whole substring; anything matching
        // neither shape is skipped as malformed.
        Self {
            numbered_phenotype: Regex::new(r"^(.*), (\d{6}) \((\d)\)(?:, (.*))?$")
                .expect("numbered phenotype pattern is valid"),
            bare_phenotype: Regex::new(r"^(.*)\((\d)\)(?:, (.*))?$")
                .expect("bare phenotype pattern is valid"),
        }
    }

    /// Parse a genemap2 file into gene records
    ///
    /// # Arguments
    /// * `path` - Path to the genemap2.txt file
    ///
    /// # Returns
    /// * `Ok(Genemap2Dataset)` - Accepted records plus per-row discard reasons
    /// * `Err(Genemap2ParseError)` - The file could not be opened or read
    ///
    /// # Format
    /// The file is tab-delimited with 14 columns (see [`columns`]). Lines
    /// starting with '#' and blank lines are skipped. Rows with fewer than
    /// 14 columns, or with an empty MIM number or gene symbols field, are
    /// dropped silently and counted in the discard list.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<Genemap2Dataset, Genemap2ParseError> {
        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        let mut discarded = Vec::new();
        let mut line_number = 0;

        for line_result in reader.lines() {
            line_number += 1;
            let line = line_result?;

            // Skip comment/header lines and blank lines
            if line.trim().is_empty() || line.trim_start().starts_with(COMMENT_MARKER) {
                continue;
            }

            match self.assemble_record(&line) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    debug!("Skipping line {}: {}", line_number, reason.as_str());
                    discarded.push(reason);
                }
            }
        }

        Ok(Genemap2Dataset { records, discarded })
    }

    /// Assemble one gene record from a data line, or decide to discard it
    ///
    /// Splits the line on tabs, extracts fixed-position fields, and
    /// decomposes the phenotype column. Field contents are trimmed here,
    /// not at line-split time.
    fn assemble_record(&self, line: &str) -> Result<GeneRecord, DiscardReason> {
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() < columns::MIN_COLUMNS {
            return Err(DiscardReason::TooFewColumns);
        }

        let mim_number = fields[columns::MIM_NUMBER].trim();
        if mim_number.is_empty() {
            return Err(DiscardReason::EmptyMimNumber);
        }

        let gene_symbols = fields[columns::GENE_SYMBOLS].trim();
        if gene_symbols.is_empty() {
            return Err(DiscardReason::EmptyGeneSymbols);
        }

        // An empty phenotype column is a gene with no known phenotype, not
        // a malformed row.
        let phenotypes = self.parse_phenotypes(fields[columns::PHENOTYPES]);

        Ok(GeneRecord {
            chromosome: fields[columns::CHROMOSOME].trim().to_string(),
            genomic_position_start: fields[columns::GENOMIC_POSITION_START].trim().to_string(),
            genomic_position_end: fields[columns::GENOMIC_POSITION_END].trim().to_string(),
            cyto_location: fields[columns::CYTO_LOCATION].trim().to_string(),
            computed_cyto_location: fields[columns::COMPUTED_CYTO_LOCATION].trim().to_string(),
            mim_number: mim_number.to_string(),
            gene_symbols: gene_symbols.to_string(),
            gene_name: fields[columns::GENE_NAME].trim().to_string(),
            approved_gene_symbol: fields[columns::APPROVED_GENE_SYMBOL].trim().to_string(),
            entrez_gene_id: fields[columns::ENTREZ_GENE_ID].trim().to_string(),
            ensembl_gene_id: fields[columns::ENSEMBL_GENE_ID].trim().to_string(),
            comments: fields[columns::COMMENTS].trim().to_string(),
            mouse_gene_id: fields[columns::MOUSE_GENE_ID].trim().to_string(),
            phenotypes,
        })
    }

    /// Decompose the phenotype column into individual entries
    ///
    /// Substrings matching neither grammar shape, or carrying a mapping key
    /// outside 1-4, are skipped; the rest of the row is unaffected.
    fn parse_phenotypes(&self, phenotype_column: &str) -> Vec<PhenotypeEntry> {
        let mut entries = Vec::new();

        for raw in phenotype_column.split(PHENOTYPE_SEPARATOR) {
            let substring = raw.trim();
            if substring.is_empty() {
                continue;
            }

            let (name, mim_number, key_digit, modes) =
                if let Some(caps) = self.numbered_phenotype.captures(substring) {
                    (
                        caps.get(1).map_or("", |m| m.as_str()),
                        caps.get(2).map(|m| m.as_str().to_string()),
                        caps.get(3).map_or("", |m| m.as_str()),
                        caps.get(4).map(|m| m.as_str()),
                    )
                } else if let Some(caps) = self.bare_phenotype.captures(substring) {
                    (
                        caps.get(1).map_or("", |m| m.as_str()),
                        None,
                        caps.get(2).map_or("", |m| m.as_str()),
                        caps.get(3).map(|m| m.as_str()),
                    )
                } else {
                    debug!("Skipping malformed phenotype substring: {}", substring);
                    continue;
                };

            let mapping_key = match key_digit
                .parse::<u8>()
                .ok()
                .and_then(MappingKey::from_digit)
            {
                Some(key) => key,
                None => {
                    debug!("Skipping phenotype with out-of-range mapping key: {}", substring);
                    continue;
                }
            };

            let inheritances = match modes {
                Some(modes) => modes
                    .split(INHERITANCE_SEPARATOR)
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect(),
                None => Vec::new(),
            };

            entries.push(PhenotypeEntry {
                name: normalize_phenotype_name(name),
                mim_number,
                mapping_key,
                inheritances,
            });
        }

        entries
    }
}

/// Strip source confidence punctuation and surrounding whitespace from a
/// phenotype name
///
/// OMIM wraps susceptibility phenotypes in braces, nondisease phenotypes in
/// brackets, and prefixes provisional ones with '?'. The normalized name
/// carries none of these.
fn normalize_phenotype_name(raw: &str) -> String {
    let mut name = raw.trim();

    if let Some(stripped) = name.strip_prefix('?') {
        name = stripped.trim_start();
    }

    if let Some(stripped) = name
        .strip_prefix('{')
        .and_then(|n| n.strip_suffix('}'))
    {
        name = stripped;
    } else if let Some(stripped) = name
        .strip_prefix('[')
        .and_then(|n| n.strip_suffix(']'))
    {
        name = stripped;
    }

    name.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Create a temporary test file with sample genemap2 data
    fn create_test_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    /// Build a 14-column data line with the given MIM number, symbols, and
    /// phenotype column
    fn data_line(mim: &str, symbols: &str, phenotypes: &str) -> String {
        format!(
            "chr1\t2160133\t2241652\t1p36.33\t1p36.33\t{}\t{}\tSKI proto-oncogene\tSKI\t6497\tENSG00000157933\t\t{}\tSki (MGI:98310)",
            mim, symbols, phenotypes
        )
    }

    #[test]
    fn test_parse_valid_file() {
        let contents = format!(
            "# Copyright (c) 1966-2026 Johns Hopkins University\n\
             # Chromosome\tGenomic Position Start\tGenomic Position End\tCyto Location\tComputed Cyto Location\tMIM Number\tGene Symbols\tGene Name\tApproved Gene Symbol\tEntrez Gene ID\tEnsembl Gene ID\tComments\tPhenotypes\tMouse Gene Symbol/ID\n\
             {}\n",
            data_line(
                "164780",
                "SKI, SGS",
                "Shprintzen-Goldberg syndrome, 182212 (3), Autosomal dominant"
            )
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();

        assert_eq!(dataset.records.len(), 1);
        assert!(dataset.discarded.is_empty());

        let record = &dataset.records[0];
        assert_eq!(record.chromosome, "chr1");
        assert_eq!(record.cyto_location, "1p36.33");
        assert_eq!(record.mim_number, "164780");
        assert_eq!(record.gene_symbols, "SKI, SGS");
        assert_eq!(record.approved_gene_symbol, "SKI");
        assert_eq!(record.entrez_gene_id, "6497");
        assert_eq!(record.ensembl_gene_id, "ENSG00000157933");

        assert_eq!(record.phenotypes.len(), 1);
        let phenotype = &record.phenotypes[0];
        assert_eq!(phenotype.name, "Shprintzen-Goldberg syndrome");
        assert_eq!(phenotype.mim_number.as_deref(), Some("182212"));
        assert_eq!(phenotype.mapping_key, MappingKey::MolecularBasisKnown);
        assert_eq!(phenotype.inheritances, vec!["Autosomal dominant"]);
    }

    #[test]
    fn test_comment_lines_never_produce_records() {
        let contents = "\
# Copyright (c) 1966-2026 Johns Hopkins University
# Generated: 2026-02-01
# Chromosome\tGenomic Position Start\tGenomic Position End
";
        let file = create_test_file(contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        assert!(dataset.records.is_empty());
        assert!(dataset.discarded.is_empty());
    }

    #[test]
    fn test_too_few_columns_is_discarded_not_error() {
        let contents = format!(
            "chr1\t100\t200\t1p36\n{}\n",
            data_line("100100", "GENEA", "")
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.discarded, vec![DiscardReason::TooFewColumns]);
    }

    #[test]
    fn test_empty_mandatory_fields_are_discarded() {
        let contents = format!(
            "{}\n{}\n{}\n",
            data_line("", "GENEA", ""),
            data_line("100200", "  ", ""),
            data_line("100300", "GENEC", "")
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert_eq!(dataset.records[0].mim_number, "100300");
        assert_eq!(
            dataset.discarded,
            vec![DiscardReason::EmptyMimNumber, DiscardReason::EmptyGeneSymbols]
        );
    }

    #[test]
    fn test_empty_phenotype_column_yields_record_with_no_entries() {
        let contents = format!("{}\n", data_line("100400", "GENED", ""));
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        assert_eq!(dataset.records.len(), 1);
        assert!(dataset.records[0].phenotypes.is_empty());
    }

    #[test]
    fn test_multiple_phenotypes_in_source_order() {
        let contents = format!(
            "{}\n",
            data_line(
                "100500",
                "GENEE",
                "Disease X, 600100 (3), Autosomal dominant; Disease Y, 600200 (2); Disease Z (1)"
            )
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        let phenotypes = &dataset.records[0].phenotypes;

        assert_eq!(phenotypes.len(), 3);
        assert_eq!(phenotypes[0].name, "Disease X");
        assert_eq!(phenotypes[1].name, "Disease Y");
        assert_eq!(phenotypes[2].name, "Disease Z");
        assert_eq!(phenotypes[2].mim_number, None);
        assert_eq!(phenotypes[2].mapping_key, MappingKey::Association);
    }

    #[test]
    fn test_missing_inheritance_is_absent_not_error() {
        let contents = format!(
            "{}\n",
            data_line("100600", "GENEF", "Disease X, 600100 (3)")
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        let phenotype = &dataset.records[0].phenotypes[0];
        assert!(phenotype.inheritances.is_empty());
    }

    #[test]
    fn test_multiple_inheritance_modes() {
        let contents = format!(
            "{}\n",
            data_line(
                "100700",
                "GENEG",
                "Deafness, autosomal recessive 1A, 220290 (3), Autosomal recessive, Digenic recessive"
            )
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        let phenotype = &dataset.records[0].phenotypes[0];
        assert_eq!(phenotype.name, "Deafness, autosomal recessive 1A");
        assert_eq!(
            phenotype.inheritances,
            vec!["Autosomal recessive", "Digenic recessive"]
        );
    }

    #[test]
    fn test_confidence_punctuation_is_stripped() {
        let contents = format!(
            "{}\n",
            data_line(
                "100800",
                "GENEH",
                "{Asthma, susceptibility to}, 600807 (3), Autosomal dominant; [Blood group, ABO], 616093 (3); ?Provisional disease, 600300 (2)"
            )
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        let phenotypes = &dataset.records[0].phenotypes;

        assert_eq!(phenotypes[0].name, "Asthma, susceptibility to");
        assert_eq!(phenotypes[1].name, "Blood group, ABO");
        assert_eq!(phenotypes[2].name, "Provisional disease");
    }

    #[test]
    fn test_malformed_phenotype_substring_is_skipped() {
        let contents = format!(
            "{}\n",
            data_line(
                "100900",
                "GENEI",
                "no mapping key here; Disease X, 600100 (3)"
            )
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        let phenotypes = &dataset.records[0].phenotypes;
        assert_eq!(phenotypes.len(), 1);
        assert_eq!(phenotypes[0].name, "Disease X");
    }

    #[test]
    fn test_out_of_range_mapping_key_is_skipped() {
        let contents = format!(
            "{}\n",
            data_line("101000", "GENEJ", "Disease X, 600100 (7)")
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let dataset = parser.parse(file.path()).unwrap();
        assert!(dataset.records[0].phenotypes.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let parser = Genemap2Parser::new();
        let result = parser.parse("/nonexistent/genemap2.txt");
        assert!(matches!(result, Err(Genemap2ParseError::IoError(_))));
    }

    #[test]
    fn test_determinism() {
        let contents = format!(
            "{}\n{}\n",
            data_line(
                "101100",
                "GENEK",
                "Disease X, 600100 (3), Autosomal dominant"
            ),
            data_line("101200", "GENEL", "")
        );
        let file = create_test_file(&contents);
        let parser = Genemap2Parser::new();

        let first = parser.parse(file.path()).unwrap();
        let second = parser.parse(file.path()).unwrap();
        assert_eq!(first.records, second.records);
        assert_eq!(first.discarded, second.discarded);
    }
}
