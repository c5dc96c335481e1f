//! UniProtKB ID-mapping file formats.
//!
//! UniProt distributes its cross-reference tables in two gzip-compressed,
//! tab-delimited layouts (see the idmapping README on the UniProt FTP site):
//!
//! - **`idmapping.dat.gz`** (free-form): three columns per line,
//!   `accession<TAB>idtype<TAB>id`, one mapped identifier per line.
//! - **`idmapping_selected.tab.gz`** (fixed-column): one row per accession
//!   with a fixed 23-column layout, each column holding the identifiers of
//!   one external database (semicolon-separated when multiple).
//!
//! # Fixed-column layout
//!
//! | Field | Column | Field | Column |
//! |---|---|---|---|
//! | UniProtKB-AC | 0 | PIR | 11 |
//! | UniProtKB-ID | 1 | NCBI-taxon | 12 |
//! | EntrezGene | 2 | MIM | 13 |
//! | RefSeq | 3 | UniGene | 15 |
//! | GI | 4 | PubMed | 16 |
//! | PDB | 5 | EMBL | 17 |
//! | GO | 6 | EMBL-CDS | 18 |
//! | UniRef100 | 7 | Ensembl | 19 |
//! | UniRef90 | 8 | Ensembl_TRS | 20 |
//! | UniRef50 | 9 | Ensembl_PRO | 21 |
//! | UniParc | 10 | Additional_PubMed | 22 |
//!
//! Column 14 is unused in current releases.
//!
//! # Examples
//!
//! ```
//! use idseek::formats::MappingFormat;
//!
//! let format = MappingFormat::from_path("data/idmapping_selected.tab.gz").unwrap();
//! assert_eq!(format, MappingFormat::Selected);
//! assert_eq!(format.column("GO"), Some(6));
//! ```

use crate::error::{IdseekError, Result};
use std::path::Path;

/// Known ID-type labels in the free-form `idmapping.dat` format.
///
/// Taken from the UniProt idmapping README; a requested `--id-type` must be
/// one of these when filtering the free-form file.
pub const DAT_ID_TYPES: &[&str] = &[
    "UniProtKB-ID",
    "Allergome",
    "ArachnoServer",
    "Araport",
    "BioCyc",
    "BioGRID",
    "BioMuta",
    "CCDS",
    "CGD",
    "ChEMBL",
    "ChiTaRS",
    "CLAE",
    "ComplexPortal",
    "CPTAC",
    "CRC64",
    "dictyBase",
    "DIP",
    "DisProt",
    "DMDM",
    "DNASU",
    "DrugBank",
    "EchoBASE",
    "eggNOG",
    "EMBL",
    "EMBL-CDS",
    "Ensembl",
    "EnsemblGenome",
    "EnsemblGenome_PRO",
    "EnsemblGenome_TRS",
    "Ensembl_PRO",
    "Ensembl_TRS",
    "ESTHER",
    "FlyBase",
    "GeneCards",
    "GeneID",
    "Gene_Name",
    "Gene_OrderedLocusName",
    "Gene_ORFName",
    "GeneReviews",
    "Gene_Synonym",
    "GeneTree",
    "GeneWiki",
    "GenomeRNAi",
    "GI",
    "GlyConnect",
    "GuidetoPHARMACOLOGY",
    "HGNC",
    "HOGENOM",
    "IDEAL",
    "KEGG",
    "LegioList",
    "Leproma",
    "MaizeGDB",
    "MEROPS",
    "MGI",
    "MIM",
    "MINT",
    "NCBI_TaxID",
    "neXtProt",
    "OMA",
    "Orphanet",
    "OrthoDB",
    "PATRIC",
    "PDB",
    "PeroxiBase",
    "PharmGKB",
    "PHI-base",
    "PlantReactome",
    "PomBase",
    "ProteomicsDB",
    "PseudoCAP",
    "Reactome",
    "RefSeq",
    "RefSeq_NT",
    "RGD",
    "SGD",
    "STRING",
    "SwissLipids",
    "TAIR",
    "TCDB",
    "TreeFam",
    "TubercuList",
    "UCSC",
    "UniParc",
    "UniPathway",
    "UniRef100",
    "UniRef50",
    "UniRef90",
    "VEuPathDB",
    "VGNC",
    "WBParaSite",
    "WBParaSite_TRS_PRO",
    "World-2DPAGE",
    "WormBase",
    "WormBase_PRO",
    "WormBase_TRS",
    "Xenbase",
    "ZFIN",
];

/// Field name and zero-based column index pairs for `idmapping_selected.tab`.
///
/// Column 14 is intentionally absent (unused in current UniProt releases).
pub const SELECTED_COLUMNS: &[(&str, usize)] = &[
    ("UniProtKB-AC", 0),
    ("UniProtKB-ID", 1),
    ("EntrezGene", 2),
    ("RefSeq", 3),
    ("GI", 4),
    ("PDB", 5),
    ("GO", 6),
    ("UniRef100", 7),
    ("UniRef90", 8),
    ("UniRef50", 9),
    ("UniParc", 10),
    ("PIR", 11),
    ("NCBI-taxon", 12),
    ("MIM", 13),
    ("UniGene", 15),
    ("PubMed", 16),
    ("EMBL", 17),
    ("EMBL-CDS", 18),
    ("Ensembl", 19),
    ("Ensembl_TRS", 20),
    ("Ensembl_PRO", 21),
    ("Additional_PubMed", 22),
];

/// Which of the two UniProt mapping layouts a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingFormat {
    /// Free-form `idmapping.dat`: `accession<TAB>idtype<TAB>id` per line
    Dat,
    /// Fixed-column `idmapping_selected.tab`: one 23-column row per accession
    Selected,
}

impl MappingFormat {
    /// Detect the format from a file path.
    ///
    /// The basename (lower-cased, up to the first `.`) selects the layout:
    /// `idmapping` is free-form, `idmapping_selected` is fixed-column.
    /// Returns `None` for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use idseek::formats::MappingFormat;
    ///
    /// assert_eq!(
    ///     MappingFormat::from_path("/data/IDmapping.dat.gz"),
    ///     Some(MappingFormat::Dat)
    /// );
    /// assert_eq!(MappingFormat::from_path("notes.txt"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let name = path.as_ref().file_name()?.to_str()?.to_lowercase();
        match name.split('.').next() {
            Some("idmapping") => Some(MappingFormat::Dat),
            Some("idmapping_selected") => Some(MappingFormat::Selected),
            _ => None,
        }
    }

    /// Like [`MappingFormat::from_path`], but unrecognized basenames are an error.
    pub fn try_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_path(&path)
            .ok_or_else(|| IdseekError::UnknownMapFile(path.as_ref().display().to_string()))
    }

    /// Known ID-type/field labels accepted for this format.
    pub fn known_id_types(&self) -> &'static [&'static str] {
        match self {
            MappingFormat::Dat => DAT_ID_TYPES,
            MappingFormat::Selected => {
                static NAMES: std::sync::OnceLock<Vec<&'static str>> = std::sync::OnceLock::new();
                NAMES.get_or_init(|| SELECTED_COLUMNS.iter().map(|(name, _)| *name).collect())
            }
        }
    }

    /// Zero-based column index of a fixed-column field, or `None` if the
    /// field is unknown or this is the free-form format.
    pub fn column(&self, field: &str) -> Option<usize> {
        match self {
            MappingFormat::Dat => None,
            MappingFormat::Selected => SELECTED_COLUMNS
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, idx)| *idx),
        }
    }

    /// CSV header line for output produced from this format.
    ///
    /// The free-form format always emits `accession,idtype,id`; the
    /// fixed-column format prepends `accession` to the requested fields.
    pub fn csv_header(&self, fields: &[String]) -> String {
        match self {
            MappingFormat::Dat => "accession,idtype,id".to_string(),
            MappingFormat::Selected => {
                let mut cols = Vec::with_capacity(fields.len() + 1);
                cols.push("accession");
                cols.extend(fields.iter().map(String::as_str));
                cols.join(",")
            }
        }
    }

    /// Validate that every requested label is known for this format.
    ///
    /// Runs before any mapping file is opened so that a typo fails fast.
    ///
    /// # Errors
    ///
    /// Returns [`IdseekError::InvalidIdType`] naming the first bad label.
    pub fn validate_id_types(&self, requested: &[String]) -> Result<()> {
        let valid = self.known_id_types();
        for id_type in requested {
            if !valid.contains(&id_type.as_str()) {
                return Err(IdseekError::InvalidIdType {
                    id_type: id_type.clone(),
                    valid: valid.join(" "),
                });
            }
        }
        Ok(())
    }
}
