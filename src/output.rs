// ==============================================================================
// output.rs - Multi-Format Output Generation
// ==============================================================================
// Description: Serializes parsed genemap records for downstream use
// Author: Matt Barham
// Created: 2026-02-09
// Modified: 2026-02-09
// Version: 1.0.0
// ==============================================================================
// Determinism: artifacts carry no timestamps and no map-ordered structures;
// re-running on identical input must produce byte-identical files.
// ==============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

// Apache Arrow/Parquet for columnar data
use arrow::array::{ArrayRef, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

// SQLite for queryable database
use rusqlite::{params, Connection};

use crate::models::GeneRecord;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Apache Parquet (best for data science: Python, R, Spark)
    Parquet,
    /// JSON (best for web APIs and JavaScript)
    Json,
    /// SQLite database (best for querying and exploration)
    Sqlite,
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "parquet",
            OutputFormat::Json => "json",
            OutputFormat::Sqlite => "db",
        }
    }

    /// Get MIME type for HTTP downloads
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Parquet => "application/vnd.apache.parquet",
            OutputFormat::Json => "application/json",
            OutputFormat::Sqlite => "application/vnd.sqlite3",
        }
    }
}

/// Complete parse output handed to the serialization sink
#[derive(Debug, Serialize, Deserialize)]
pub struct GenemapOutput {
    /// Metadata about the run
    pub metadata: OutputMetadata,

    /// Gene records with nested phenotype entries, in source order
    pub genes: Vec<GeneRecord>,
}

/// Run metadata
///
/// Deliberately timestamp-free so identical input yields identical artifacts.
#[derive(Debug, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub source_file: String,
    pub source_sha256: String,
    pub total_genes: usize,
    pub total_phenotypes: usize,
    pub discarded_rows: usize,
}

/// Multi-format output generator
pub struct OutputGenerator {
    output_dir: PathBuf,
}

impl OutputGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Generate output in the specified formats
    ///
    /// # Arguments
    /// * `formats` - List of formats to generate
    /// * `output` - Parsed records and run metadata
    ///
    /// # Returns
    /// * HashMap of format -> file path
    pub fn generate(
        &self,
        formats: &[OutputFormat],
        output: &GenemapOutput,
    ) -> Result<HashMap<OutputFormat, PathBuf>> {
        // Create output directory
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", self.output_dir))?;

        let mut result = HashMap::new();

        for format in formats {
            let path = self.generate_format(format, output)?;
            result.insert(*format, path);
        }

        Ok(result)
    }

    /// Generate one format
    fn generate_format(&self, format: &OutputFormat, output: &GenemapOutput) -> Result<PathBuf> {
        let filename = format!("genemap2.{}", format.extension());
        let path = self.output_dir.join(&filename);

        match format {
            OutputFormat::Json => self.generate_json(&path, output),
            OutputFormat::Parquet => self.generate_parquet(&path, output),
            OutputFormat::Sqlite => self.generate_sqlite(&path, output),
        }
    }

    /// Generate JSON output (nested records serialized whole)
    fn generate_json(&self, path: &Path, output: &GenemapOutput) -> Result<PathBuf> {
        info!("Generating JSON output: {:?}", path);

        let file = std::fs::File::create(path).context("Failed to create JSON output file")?;

        serde_json::to_writer_pretty(file, output).context("Failed to write JSON output")?;

        info!(
            "JSON output complete: {} genes, {} phenotype entries",
            output.metadata.total_genes, output.metadata.total_phenotypes
        );

        Ok(path.to_path_buf())
    }

    /// Generate Parquet output (columnar format for data science)
    ///
    /// Nested records are flattened to one row per (gene, phenotype) with
    /// nullable phenotype columns; a gene with zero phenotypes emits one row
    /// with null phenotype fields, so the full structure is reconstructible.
    /// Inheritance modes are rejoined with ", ", their source separator.
    fn generate_parquet(&self, path: &Path, output: &GenemapOutput) -> Result<PathBuf> {
        info!("Generating Parquet output: {:?}", path);

        struct FlatRow<'a> {
            gene: &'a GeneRecord,
            ordinal: Option<u64>,
            name: Option<&'a str>,
            mim_number: Option<&'a str>,
            mapping_key: Option<u64>,
            inheritances: Option<String>,
        }

        let mut rows: Vec<FlatRow> = Vec::new();
        for gene in &output.genes {
            if gene.phenotypes.is_empty() {
                rows.push(FlatRow {
                    gene,
                    ordinal: None,
                    name: None,
                    mim_number: None,
                    mapping_key: None,
                    inheritances: None,
                });
            } else {
                for (ordinal, phenotype) in gene.phenotypes.iter().enumerate() {
                    rows.push(FlatRow {
                        gene,
                        ordinal: Some(ordinal as u64),
                        name: Some(phenotype.name.as_str()),
                        mim_number: phenotype.mim_number.as_deref(),
                        mapping_key: Some(phenotype.mapping_key.as_digit() as u64),
                        inheritances: Some(phenotype.inheritances.join(", ")),
                    });
                }
            }
        }

        let schema = Arc::new(Schema::new(vec![
            Field::new("chromosome", DataType::Utf8, false),
            Field::new("genomic_position_start", DataType::Utf8, false),
            Field::new("genomic_position_end", DataType::Utf8, false),
            Field::new("cyto_location", DataType::Utf8, false),
            Field::new("computed_cyto_location", DataType::Utf8, false),
            Field::new("mim_number", DataType::Utf8, false),
            Field::new("gene_symbols", DataType::Utf8, false),
            Field::new("gene_name", DataType::Utf8, false),
            Field::new("approved_gene_symbol", DataType::Utf8, false),
            Field::new("entrez_gene_id", DataType::Utf8, false),
            Field::new("ensembl_gene_id", DataType::Utf8, false),
            Field::new("comments", DataType::Utf8, false),
            Field::new("mouse_gene_id", DataType::Utf8, false),
            Field::new("phenotype_ordinal", DataType::UInt64, true),
            Field::new("phenotype_name", DataType::Utf8, true),
            Field::new("phenotype_mim_number", DataType::Utf8, true),
            Field::new("phenotype_mapping_key", DataType::UInt64, true),
            Field::new("phenotype_inheritances", DataType::Utf8, true),
        ]));

        let chromosome_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.chromosome.as_str()).collect::<Vec<_>>(),
        ));
        let position_start_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.genomic_position_start.as_str()).collect::<Vec<_>>(),
        ));
        let position_end_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.genomic_position_end.as_str()).collect::<Vec<_>>(),
        ));
        let cyto_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.cyto_location.as_str()).collect::<Vec<_>>(),
        ));
        let computed_cyto_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.computed_cyto_location.as_str()).collect::<Vec<_>>(),
        ));
        let mim_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.mim_number.as_str()).collect::<Vec<_>>(),
        ));
        let symbols_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.gene_symbols.as_str()).collect::<Vec<_>>(),
        ));
        let gene_name_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.gene_name.as_str()).collect::<Vec<_>>(),
        ));
        let approved_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.approved_gene_symbol.as_str()).collect::<Vec<_>>(),
        ));
        let entrez_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.entrez_gene_id.as_str()).collect::<Vec<_>>(),
        ));
        let ensembl_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.ensembl_gene_id.as_str()).collect::<Vec<_>>(),
        ));
        let comments_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.comments.as_str()).collect::<Vec<_>>(),
        ));
        let mouse_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.gene.mouse_gene_id.as_str()).collect::<Vec<_>>(),
        ));
        let ordinal_array: ArrayRef = Arc::new(UInt64Array::from(
            rows.iter().map(|r| r.ordinal).collect::<Vec<_>>(),
        ));
        let phenotype_name_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.name).collect::<Vec<_>>(),
        ));
        let phenotype_mim_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.mim_number).collect::<Vec<_>>(),
        ));
        let mapping_key_array: ArrayRef = Arc::new(UInt64Array::from(
            rows.iter().map(|r| r.mapping_key).collect::<Vec<_>>(),
        ));
        let inheritances_array: ArrayRef = Arc::new(StringArray::from(
            rows.iter().map(|r| r.inheritances.as_deref()).collect::<Vec<_>>(),
        ));

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                chromosome_array,
                position_start_array,
                position_end_array,
                cyto_array,
                computed_cyto_array,
                mim_array,
                symbols_array,
                gene_name_array,
                approved_array,
                entrez_array,
                ensembl_array,
                comments_array,
                mouse_array,
                ordinal_array,
                phenotype_name_array,
                phenotype_mim_array,
                mapping_key_array,
                inheritances_array,
            ],
        )
        .context("Failed to create Arrow RecordBatch")?;

        let file = std::fs::File::create(path).context("Failed to create Parquet file")?;
        let props = WriterProperties::builder()
            .set_compression(parquet::basic::Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema, Some(props))
            .context("Failed to create Parquet writer")?;

        writer.write(&batch).context("Failed to write Parquet data")?;
        writer.close().context("Failed to close Parquet writer")?;

        info!(
            "Parquet output complete: {} genes flattened to {} rows",
            output.metadata.total_genes,
            rows.len()
        );

        Ok(path.to_path_buf())
    }

    /// Generate SQLite output (queryable database)
    fn generate_sqlite(&self, path: &Path, output: &GenemapOutput) -> Result<PathBuf> {
        info!("Generating SQLite output: {:?}", path);

        // Replace any stale artifact so the database is built from scratch
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove existing SQLite file")?;
        }

        let mut conn = Connection::open(path).context("Failed to create SQLite database")?;

        conn.execute(
            "CREATE TABLE genes (
                mim_number TEXT PRIMARY KEY,
                chromosome TEXT NOT NULL,
                genomic_position_start TEXT NOT NULL,
                genomic_position_end TEXT NOT NULL,
                cyto_location TEXT NOT NULL,
                computed_cyto_location TEXT NOT NULL,
                gene_symbols TEXT NOT NULL,
                gene_name TEXT NOT NULL,
                approved_gene_symbol TEXT NOT NULL,
                entrez_gene_id TEXT NOT NULL,
                ensembl_gene_id TEXT NOT NULL,
                comments TEXT NOT NULL,
                mouse_gene_id TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create genes table")?;

        conn.execute(
            "CREATE TABLE phenotypes (
                gene_mim_number TEXT NOT NULL,
                ordinal INTEGER NOT NULL,
                name TEXT NOT NULL,
                mim_number TEXT,
                mapping_key INTEGER NOT NULL,
                inheritances TEXT NOT NULL,
                PRIMARY KEY (gene_mim_number, ordinal)
            )",
            [],
        )
        .context("Failed to create phenotypes table")?;

        conn.execute(
            "CREATE TABLE metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )
        .context("Failed to create metadata table")?;

        // Insert metadata
        let total_genes_str = output.metadata.total_genes.to_string();
        let total_phenotypes_str = output.metadata.total_phenotypes.to_string();
        let discarded_rows_str = output.metadata.discarded_rows.to_string();

        let metadata_items = vec![
            ("source_file", &output.metadata.source_file),
            ("source_sha256", &output.metadata.source_sha256),
            ("total_genes", &total_genes_str),
            ("total_phenotypes", &total_phenotypes_str),
            ("discarded_rows", &discarded_rows_str),
        ];

        for (key, value) in metadata_items {
            conn.execute(
                "INSERT INTO metadata (key, value) VALUES (?1, ?2)",
                params![key, value],
            )
            .context("Failed to insert metadata")?;
        }

        // Insert genes and phenotypes in one transaction
        let tx = conn.transaction().context("Failed to start transaction")?;
        {
            let mut gene_stmt = tx
                .prepare(
                    "INSERT INTO genes
                     (mim_number, chromosome, genomic_position_start, genomic_position_end,
                      cyto_location, computed_cyto_location, gene_symbols, gene_name,
                      approved_gene_symbol, entrez_gene_id, ensembl_gene_id, comments, mouse_gene_id)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                )
                .context("Failed to prepare genes insert statement")?;

            let mut phenotype_stmt = tx
                .prepare(
                    "INSERT INTO phenotypes
                     (gene_mim_number, ordinal, name, mim_number, mapping_key, inheritances)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )
                .context("Failed to prepare phenotypes insert statement")?;

            for gene in &output.genes {
                gene_stmt
                    .execute(params![
                        gene.mim_number,
                        gene.chromosome,
                        gene.genomic_position_start,
                        gene.genomic_position_end,
                        gene.cyto_location,
                        gene.computed_cyto_location,
                        gene.gene_symbols,
                        gene.gene_name,
                        gene.approved_gene_symbol,
                        gene.entrez_gene_id,
                        gene.ensembl_gene_id,
                        gene.comments,
                        gene.mouse_gene_id,
                    ])
                    .context("Failed to insert gene")?;

                for (ordinal, phenotype) in gene.phenotypes.iter().enumerate() {
                    phenotype_stmt
                        .execute(params![
                            gene.mim_number,
                            ordinal as i64,
                            phenotype.name,
                            phenotype.mim_number,
                            phenotype.mapping_key.as_digit(),
                            phenotype.inheritances.join(", "),
                        ])
                        .context("Failed to insert phenotype")?;
                }
            }
        }
        tx.commit().context("Failed to commit records")?;

        // Indexes for the common lookup paths
        conn.execute(
            "CREATE INDEX idx_genes_symbol ON genes(approved_gene_symbol)",
            [],
        )
        .context("Failed to create gene symbol index")?;
        conn.execute(
            "CREATE INDEX idx_phenotypes_gene ON phenotypes(gene_mim_number)",
            [],
        )
        .context("Failed to create phenotype gene index")?;

        info!(
            "SQLite output complete: {} genes, {} phenotype entries",
            output.metadata.total_genes, output.metadata.total_phenotypes
        );

        Ok(path.to_path_buf())
    }
}
