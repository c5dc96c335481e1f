//! Integration tests for the concurrent filter engine
//!
//! These tests build small gzip-compressed mapping fixtures on disk and run
//! the full pipeline against them: line source, dispatcher, worker pool,
//! aggregation, and CSV output.

use flate2::write::GzEncoder;
use flate2::Compression;
use idseek::filter::{run_filter, DatFilter, FilterConfig, MembershipSet, SelectedFilter};
use idseek::formats::MappingFormat;
use idseek::io::{read_accessions, write_csv_file};
use std::collections::HashSet;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Write a gzip fixture: a header line followed by the given rows.
fn write_gz_fixture(rows: &[String]) -> NamedTempFile {
    let file = NamedTempFile::with_suffix(".tab.gz").unwrap();
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
    writeln!(encoder, "header line, skipped unconditionally").unwrap();
    for row in rows {
        writeln!(encoder, "{}", row).unwrap();
    }
    encoder.finish().unwrap();
    file
}

/// A 23-column `idmapping_selected` row with recognizable values in the
/// RefSeq (3) and GO (6) columns.
fn selected_row(accession: &str) -> String {
    let mut cols: Vec<String> = (0..23).map(|i| format!("c{}", i)).collect();
    cols[0] = accession.to_string();
    cols[1] = format!("{}_ID", accession);
    cols[3] = format!("RefSeq_{}", accession);
    cols[6] = format!("GO:{}", accession);
    cols.join("\t")
}

fn engine_config(chunk_len: usize, workers: usize) -> FilterConfig {
    FilterConfig {
        chunk_len,
        workers,
        ..FilterConfig::default()
    }
}

#[test]
fn selected_membership_is_iff() {
    // A row appears in the result iff its accession-column value is in the set.
    let rows: Vec<String> = (0..100)
        .map(|i| selected_row(&format!("P{:05}", i)))
        .collect();
    let file = write_gz_fixture(&rows);

    let wanted = ["P00003", "P00042", "P00097"];
    // An accession with no row keeps the early stop from firing.
    let accessions: MembershipSet = wanted.iter().copied().chain(["ABSENT"]).collect();

    let fields = vec!["RefSeq".to_string(), "GO".to_string()];
    let matches = run_filter(
        file.path(),
        SelectedFilter::new(&fields, accessions).unwrap(),
        &engine_config(16, 4),
    )
    .unwrap();

    let result: HashSet<String> = matches.into_iter().collect();
    let expected: HashSet<String> = wanted
        .iter()
        .map(|acc| format!("{},RefSeq_{},GO:{}", acc, acc, acc))
        .collect();
    assert_eq!(result, expected);
}

#[test]
fn selected_record_has_one_value_per_requested_field() {
    let rows = vec![selected_row("P12345")];
    let file = write_gz_fixture(&rows);

    for fields in [
        vec!["GO".to_string()],
        vec!["RefSeq".to_string(), "GO".to_string()],
        vec![
            "UniProtKB-ID".to_string(),
            "RefSeq".to_string(),
            "GO".to_string(),
            "UniParc".to_string(),
        ],
    ] {
        let accessions: MembershipSet = ["P12345", "ABSENT"].into_iter().collect();
        let matches = run_filter(
            file.path(),
            SelectedFilter::new(&fields, accessions).unwrap(),
            &engine_config(16, 2),
        )
        .unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].split(',').count(), 1 + fields.len());
    }
}

#[test]
fn selected_documented_example() {
    // Accession set {P12345, Q9Y6K9}, requested fields {RefSeq, GO}: a row for
    // P12345 with RefSeq123 and GO:0005524 at the documented offsets yields
    // "P12345,RefSeq123,GO:0005524".
    let mut cols: Vec<String> = (0..23).map(|_| "x".to_string()).collect();
    cols[0] = "P12345".to_string();
    cols[1] = "P12345_ID".to_string();
    cols[3] = "RefSeq123".to_string();
    cols[6] = "GO:0005524".to_string();
    let file = write_gz_fixture(&[cols.join("\t")]);

    let accessions: MembershipSet = ["P12345", "Q9Y6K9"].into_iter().collect();
    let fields = vec!["RefSeq".to_string(), "GO".to_string()];
    let matches = run_filter(
        file.path(),
        SelectedFilter::new(&fields, accessions).unwrap(),
        &engine_config(1024, 2),
    )
    .unwrap();

    assert_eq!(matches, vec!["P12345,RefSeq123,GO:0005524"]);
}

#[test]
fn dat_requires_both_id_type_and_accession() {
    let rows = vec![
        "P12345\tRefSeq\tNP_001.1".to_string(),
        "P12345\tGeneID\t815394".to_string(),  // wrong id-type
        "O00000\tRefSeq\tNP_002.2".to_string(), // wrong accession
        "Q9Y6K9\tRefSeq\tNP_003.3".to_string(),
        "Q9Y6K9\tGO\tGO:0005524".to_string(),
    ];
    let file = write_gz_fixture(&rows);

    let id_types: MembershipSet = ["RefSeq", "GO"].into_iter().collect();
    let accessions: MembershipSet = ["P12345", "Q9Y6K9", "ABSENT"].into_iter().collect();

    let matches = run_filter(
        file.path(),
        DatFilter::new(id_types, accessions),
        &engine_config(2, 3),
    )
    .unwrap();

    let result: HashSet<String> = matches.into_iter().collect();
    let expected: HashSet<String> = [
        "P12345,RefSeq,NP_001.1",
        "Q9Y6K9,RefSeq,NP_003.3",
        "Q9Y6K9,GO,GO:0005524",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(result, expected);
}

#[test]
fn chunk_boundaries_drop_and_duplicate_nothing() {
    // Input sizes of chunk-1, chunk, and chunk+1 lines must each survive
    // batching exactly once.
    const CHUNK: usize = 8;

    for line_count in [CHUNK - 1, CHUNK, CHUNK + 1] {
        let accessions_in_file: Vec<String> =
            (0..line_count).map(|i| format!("B{:04}", i)).collect();
        let rows: Vec<String> = accessions_in_file
            .iter()
            .map(|acc| selected_row(acc))
            .collect();
        let file = write_gz_fixture(&rows);

        // Every row matches; the extra absent accession disarms early stop.
        let accessions: MembershipSet = accessions_in_file
            .iter()
            .cloned()
            .chain(["ABSENT".to_string()])
            .collect();

        let fields = vec!["UniProtKB-ID".to_string()];
        let matches = run_filter(
            file.path(),
            SelectedFilter::new(&fields, accessions).unwrap(),
            &engine_config(CHUNK, 4),
        )
        .unwrap();

        assert_eq!(matches.len(), line_count, "line_count={}", line_count);
        let distinct: HashSet<&String> = matches.iter().collect();
        assert_eq!(distinct.len(), line_count, "line_count={}", line_count);
    }
}

#[test]
fn result_set_is_independent_of_scheduling() {
    let rows: Vec<String> = (0..500)
        .map(|i| selected_row(&format!("S{:04}", i % 120)))
        .collect();
    let file = write_gz_fixture(&rows);

    let wanted: Vec<String> = (0..60).map(|i| format!("S{:04}", i * 2)).collect();
    let fields = vec!["RefSeq".to_string()];

    let run = |chunk_len: usize, workers: usize| -> HashSet<String> {
        // Pad the set with absent accessions so the early-stop threshold
        // exceeds the total match count; otherwise the stop point (and with
        // it the result set) would depend on scheduling.
        let accessions: MembershipSet = wanted
            .iter()
            .cloned()
            .chain((0..300).map(|i| format!("NEVER{:03}", i)))
            .collect();
        run_filter(
            file.path(),
            SelectedFilter::new(&fields, accessions).unwrap(),
            &engine_config(chunk_len, workers),
        )
        .unwrap()
        .into_iter()
        .collect()
    };

    let sequential = run(1024, 1);
    let concurrent = run(7, 8);
    let tiny_batches = run(1, 3);

    assert_eq!(sequential, concurrent);
    assert_eq!(sequential, tiny_batches);
}

#[test]
fn early_stop_halts_before_end_of_file() {
    // Two accessions, fixed-column layout: dispatch stops once two matches
    // are recorded, even though every later line would also match. Already
    // submitted batches still complete, so the result may overshoot the
    // threshold but must stay far short of the full file.
    const TOTAL: usize = 20_000;
    let rows: Vec<String> = (0..TOTAL)
        .map(|i| selected_row(if i % 2 == 0 { "P12345" } else { "Q9Y6K9" }))
        .collect();
    let file = write_gz_fixture(&rows);

    let accessions: MembershipSet = ["P12345", "Q9Y6K9"].into_iter().collect();
    let fields = vec!["GO".to_string()];
    let matches = run_filter(
        file.path(),
        SelectedFilter::new(&fields, accessions).unwrap(),
        &engine_config(16, 1),
    )
    .unwrap();

    assert!(matches.len() >= 2, "stopped before the threshold was met");
    assert!(
        matches.len() < TOTAL,
        "early stop never fired: all {} rows were processed",
        matches.len()
    );
}

#[test]
fn dat_early_stop_expects_two_matches_per_accession() {
    // Free-form layout: threshold is 2 x |accessions|. With one accession
    // and exactly two matching lines early in the file, the tail is skipped.
    const TAIL: usize = 20_000;
    let mut rows = vec![
        "P12345\tRefSeq\tNP_001.1".to_string(),
        "P12345\tUniProtKB-ID\tP12345_ID".to_string(),
    ];
    rows.extend((0..TAIL).map(|i| format!("P12345\tRefSeq\tNP_{:06}.1", i)));
    let file = write_gz_fixture(&rows);

    let id_types: MembershipSet = ["RefSeq", "UniProtKB-ID"].into_iter().collect();
    let accessions: MembershipSet = ["P12345"].into_iter().collect();

    let matches = run_filter(
        file.path(),
        DatFilter::new(id_types, accessions),
        &engine_config(16, 1),
    )
    .unwrap();

    assert!(matches.len() >= 2);
    assert!(matches.len() < TAIL);
}

#[test]
fn malformed_rows_are_skipped_not_fatal() {
    let rows = vec![
        selected_row("P12345"),
        "Q9Y6K9\tshort_row".to_string(), // matches on accession, lacks column 6
        selected_row("Q9Y6K9"),
    ];
    let file = write_gz_fixture(&rows);

    let accessions: MembershipSet = ["P12345", "Q9Y6K9", "ABSENT"].into_iter().collect();
    let fields = vec!["GO".to_string()];
    let matches = run_filter(
        file.path(),
        SelectedFilter::new(&fields, accessions).unwrap(),
        &engine_config(1024, 2),
    )
    .unwrap();

    let result: HashSet<String> = matches.into_iter().collect();
    let expected: HashSet<String> = ["P12345,GO:P12345", "Q9Y6K9,GO:Q9Y6K9"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(result, expected);
}

#[test]
fn end_to_end_selected_pipeline() {
    // Accession CSV -> membership set -> filter -> CSV file with header.
    let dir = TempDir::new().unwrap();

    let hits_path = dir.path().join("best_hits.csv");
    std::fs::write(
        &hits_path,
        "query,evalue,accession\nq1,1e-50,P12345\nq2,1e-40,Q9Y6K9\nq3,1e-30,P12345\n",
    )
    .unwrap();

    let map_path = dir.path().join("idmapping_selected.tab.gz");
    {
        let mut encoder = GzEncoder::new(
            std::fs::File::create(&map_path).unwrap(),
            Compression::default(),
        );
        writeln!(encoder, "header").unwrap();
        writeln!(encoder, "{}", selected_row("P12345")).unwrap();
        writeln!(encoder, "{}", selected_row("O99999")).unwrap();
        writeln!(encoder, "{}", selected_row("Q9Y6K9")).unwrap();
        encoder.finish().unwrap();
    }

    let accessions = read_accessions(&hits_path).unwrap();
    assert_eq!(accessions, vec!["P12345", "Q9Y6K9"]);

    let format = MappingFormat::try_from_path(&map_path).unwrap();
    assert_eq!(format, MappingFormat::Selected);

    let fields = vec!["RefSeq".to_string(), "GO".to_string()];
    format.validate_id_types(&fields).unwrap();

    let matches = run_filter(
        &map_path,
        SelectedFilter::new(&fields, MembershipSet::new(accessions)).unwrap(),
        &engine_config(2, 2),
    )
    .unwrap();

    let out_path = dir.path().join("out.csv");
    write_csv_file(&out_path, &format.csv_header(&fields), &matches).unwrap();

    let text = std::fs::read_to_string(&out_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("accession,RefSeq,GO"));

    let body: HashSet<&str> = lines.collect();
    let expected: HashSet<&str> = [
        "P12345,RefSeq_P12345,GO:P12345",
        "Q9Y6K9,RefSeq_Q9Y6K9,GO:Q9Y6K9",
    ]
    .into_iter()
    .collect();
    assert_eq!(body, expected);
}

#[test]
fn invalid_id_type_fails_before_any_file_io() {
    let err = MappingFormat::Selected
        .validate_id_types(&["RefSeq".to_string(), "NotAField".to_string()])
        .unwrap_err();
    assert!(err.to_string().contains("NotAField"));
}
