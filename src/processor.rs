// ==============================================================================
// processor.rs - Core Genemap Processing Logic
// ==============================================================================
// Description: Validates, parses, and serializes one genemap2 export
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::models::DiscardReason;
use crate::output::{GenemapOutput, OutputFormat, OutputGenerator, OutputMetadata};
use crate::parsers::Genemap2Parser;
use crate::validator::FileValidator;

pub struct GenemapProcessor {
    input_file: PathBuf,
    output_dir: PathBuf,
    formats: Vec<OutputFormat>,
}

impl GenemapProcessor {
    pub fn new(input_file: PathBuf, output_dir: PathBuf, formats: Vec<OutputFormat>) -> Self {
        Self {
            input_file,
            output_dir,
            formats,
        }
    }

    /// Main processing pipeline
    ///
    /// Single-threaded, one synchronous pass: validate the input, parse it
    /// into records, log run statistics, and hand the records to the output
    /// generator. Zero accepted records is a successful run.
    pub fn process(&self) -> Result<HashMap<OutputFormat, PathBuf>> {
        info!("Starting genemap2 processing: {:?}", self.input_file);

        // 1. Validate input file
        let validated = FileValidator::new()
            .validate_input(&self.input_file)
            .context("Input validation failed")?;
        info!(
            "Input validated: {} ({} bytes, sha256 {})",
            validated.file_name, validated.size, validated.hash_sha256
        );

        // 2. Parse into gene records
        let parser = Genemap2Parser::new();
        let dataset = parser
            .parse(&self.input_file)
            .context("Failed to parse genemap2 file")?;

        // 3. Run statistics
        let total_phenotypes: usize = dataset.records.iter().map(|r| r.phenotypes.len()).sum();
        info!(
            "Parse complete: {} gene records, {} phenotype entries, {} rows discarded",
            dataset.records.len(),
            total_phenotypes,
            dataset.discarded.len()
        );
        for reason in [
            DiscardReason::TooFewColumns,
            DiscardReason::EmptyMimNumber,
            DiscardReason::EmptyGeneSymbols,
        ] {
            let count = dataset.discarded.iter().filter(|r| **r == reason).count();
            if count > 0 {
                debug!("Discarded {} rows: {}", count, reason.as_str());
            }
        }

        // 4. Generate output artifacts
        let output = GenemapOutput {
            metadata: OutputMetadata {
                source_file: validated.file_name,
                source_sha256: validated.hash_sha256,
                total_genes: dataset.records.len(),
                total_phenotypes,
                discarded_rows: dataset.discarded.len(),
            },
            genes: dataset.records,
        };

        let generator = OutputGenerator::new(self.output_dir.clone());
        let paths = generator
            .generate(&self.formats, &output)
            .context("Failed to generate output artifacts")?;

        info!("Processing complete, {} artifact(s) written", paths.len());
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, Builder};

    fn genemap2_temp_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const SAMPLE: &str = "\
# Copyright (c) 1966-2026 Johns Hopkins University
# Chromosome\tGenomic Position Start\tGenomic Position End\tCyto Location\tComputed Cyto Location\tMIM Number\tGene Symbols\tGene Name\tApproved Gene Symbol\tEntrez Gene ID\tEnsembl Gene ID\tComments\tPhenotypes\tMouse Gene Symbol/ID
chr1\t2160133\t2241652\t1p36.33\t1p36.33\t164780\tSKI, SGS\tSKI proto-oncogene\tSKI\t6497\tENSG00000157933\t\tShprintzen-Goldberg syndrome, 182212 (3), Autosomal dominant\tSki (MGI:98310)
chr2\t100\t200\t2q11\t2q11\t100200\tGENEB\tGene B\tGENEB\t2\tENSG2\t\t\t
";

    #[test]
    fn test_end_to_end_pipeline() {
        let input = genemap2_temp_file(SAMPLE);
        let dir = tempdir().unwrap();

        let processor = GenemapProcessor::new(
            input.path().to_path_buf(),
            dir.path().to_path_buf(),
            vec![OutputFormat::Json],
        );

        let paths = processor.process().unwrap();
        assert!(paths[&OutputFormat::Json].exists());

        let contents = std::fs::read_to_string(&paths[&OutputFormat::Json]).unwrap();
        let decoded: GenemapOutput = serde_json::from_str(&contents).unwrap();
        assert_eq!(decoded.metadata.total_genes, 2);
        assert_eq!(decoded.metadata.total_phenotypes, 1);
        assert!(decoded.genes[1].phenotypes.is_empty());
    }

    #[test]
    fn test_missing_input_fails_without_artifact() {
        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("out");

        let processor = GenemapProcessor::new(
            PathBuf::from("/nonexistent/genemap2.txt"),
            out_dir.clone(),
            vec![OutputFormat::Json],
        );

        assert!(processor.process().is_err());
        assert!(!out_dir.exists());
    }

    #[test]
    fn test_re_run_produces_identical_artifacts() {
        let input = genemap2_temp_file(SAMPLE);
        let dir_a = tempdir().unwrap();
        let dir_b = tempdir().unwrap();

        let run = |dir: &std::path::Path| {
            GenemapProcessor::new(
                input.path().to_path_buf(),
                dir.to_path_buf(),
                vec![OutputFormat::Json, OutputFormat::Parquet],
            )
            .process()
            .unwrap()
        };

        let paths_a = run(dir_a.path());
        let paths_b = run(dir_b.path());

        for format in [OutputFormat::Json, OutputFormat::Parquet] {
            let bytes_a = std::fs::read(&paths_a[&format]).unwrap();
            let bytes_b = std::fs::read(&paths_b[&format]).unwrap();
            assert_eq!(bytes_a, bytes_b);
        }
    }
}
