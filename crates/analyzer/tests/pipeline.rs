use atlas_analyzer::{AnalysisStrategy, AnalyzerConfig, AnalyzerError, ProjectAnalyzer};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

/// A 500-byte function block spanning exactly five lines
fn generated_function(i: usize) -> String {
    let header = format!("function generated_{i:02}() {{\n");
    let tail = "  return value;\n}\n\n";
    let overhead = "  const value = \"\";\n".len();
    let fill = 500 - header.len() - tail.len() - overhead;
    format!("{header}  const value = \"{}\";\n{tail}", "x".repeat(fill))
}

#[tokio::test]
async fn small_file_takes_the_direct_path() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("mod.js"), "const a = 1;\nfunction f(){}\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    assert_eq!(analysis.modules.len(), 1);
    let module = &analysis.modules[0];
    assert_eq!(module.strategy, AnalysisStrategy::Direct);
    assert_eq!(module.total_functions, 1);
    assert_eq!(module.functions[0].name, "f");
    assert_eq!(module.functions[0].line, 2);
    assert_eq!(analysis.stats.files, 1);
    assert_eq!(analysis.stats.chunks, 1);
}

#[tokio::test]
async fn large_generated_file_is_chunked_and_merged_losslessly() {
    let temp = tempdir().unwrap();
    let content: String = (0..40).map(generated_function).collect();
    assert_eq!(content.len(), 20_000);
    fs::write(temp.path().join("gen.js"), &content).unwrap();

    let config = AnalyzerConfig {
        // Push the 20k file over the "large" bar so the chunked path runs.
        large_file_threshold: Some(10_000),
        ..Default::default()
    };
    let mut analyzer = ProjectAnalyzer::new(temp.path(), config).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    assert_eq!(analysis.modules.len(), 1);
    let module = &analysis.modules[0];
    assert_eq!(module.strategy, AnalysisStrategy::Chunked);
    assert_eq!(analysis.stats.chunks, 3);
    assert_eq!(module.total_functions, 40);
    assert_eq!(module.cross_chunk.deduplicated, 0);

    // Every function reports its true position in the original file.
    for (i, function) in module.functions.iter().enumerate() {
        assert_eq!(function.name, format!("generated_{i:02}"));
        assert_eq!(function.line, 5 * i + 1, "function {}", function.name);
    }
}

#[tokio::test]
async fn chunked_and_direct_paths_agree_on_function_count() {
    let temp = tempdir().unwrap();
    let content: String = (0..40).map(generated_function).collect();
    fs::write(temp.path().join("gen.js"), &content).unwrap();

    let mut direct = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let direct_run = direct.analyze().await.unwrap();
    assert_eq!(direct_run.modules[0].strategy, AnalysisStrategy::Direct);

    let mut chunked = ProjectAnalyzer::new(
        temp.path(),
        AnalyzerConfig {
            large_file_threshold: Some(10_000),
            ..Default::default()
        },
    )
    .unwrap();
    let chunked_run = chunked.analyze().await.unwrap();
    assert_eq!(chunked_run.modules[0].strategy, AnalysisStrategy::Chunked);

    assert_eq!(
        direct_run.modules[0].total_functions,
        chunked_run.modules[0].total_functions
    );
}

#[tokio::test]
async fn second_run_is_served_from_the_session_cache() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.js"), "function a() {}\n").unwrap();
    fs::write(temp.path().join("b.js"), "function b() { return 1; }\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let first = analyzer.analyze().await.unwrap();
    assert_eq!(first.stats.cache_hits, 0);

    let second = analyzer.analyze().await.unwrap();
    assert_eq!(second.stats.cache_hits, 2);

    let mut first_modules = first.modules.clone();
    let mut second_modules = second.modules.clone();
    first_modules.sort_by(|a, b| a.file.relative_path.cmp(&b.file.relative_path));
    second_modules.sort_by(|a, b| a.file.relative_path.cmp(&b.file.relative_path));
    assert_eq!(first_modules, second_modules);
}

#[tokio::test]
async fn size_change_invalidates_only_that_file() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.js"), "function a() {}\n").unwrap();
    fs::write(temp.path().join("b.js"), "function b() {}\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    analyzer.analyze().await.unwrap();

    fs::write(
        temp.path().join("b.js"),
        "function b() {}\nfunction extra() {}\n",
    )
    .unwrap();
    let second = analyzer.analyze().await.unwrap();

    assert_eq!(second.stats.cache_hits, 1);
    let b = second
        .modules
        .iter()
        .find(|m| m.file.relative_path == "b.js")
        .unwrap();
    assert_eq!(b.total_functions, 2);
}

#[tokio::test]
async fn deleting_a_file_between_runs_is_not_an_error() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("keep.js"), "function keep() {}\n").unwrap();
    fs::write(temp.path().join("gone.js"), "function gone() {}\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let first = analyzer.analyze().await.unwrap();
    assert_eq!(first.modules.len(), 2);

    fs::remove_file(temp.path().join("gone.js")).unwrap();
    let second = analyzer.analyze().await.unwrap();

    assert_eq!(second.modules.len(), 1);
    assert_eq!(second.modules[0].file.relative_path, "keep.js");
    // The survivor is still served warm; no blanket invalidation.
    assert_eq!(second.stats.cache_hits, 1);
    assert_eq!(second.stats.failed, 0);
}

#[tokio::test]
async fn skipped_and_failed_files_are_visible_in_stats() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("ok.js"), "function ok() {}\n").unwrap();
    fs::write(temp.path().join("empty.js"), "").unwrap();
    fs::write(temp.path().join("huge.js"), "x".repeat(2_000)).unwrap();

    let config = AnalyzerConfig {
        max_file_size_bytes: 1_000,
        ..Default::default()
    };
    let mut analyzer = ProjectAnalyzer::new(temp.path(), config).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    assert_eq!(analysis.stats.files, 1);
    assert_eq!(analysis.stats.skipped, 2);
    assert_eq!(analysis.stats.errors.len(), 2);
    assert_eq!(analysis.modules.len(), 1);
}

#[tokio::test]
async fn missing_root_fails_the_whole_run() {
    let temp = tempdir().unwrap();
    let gone = temp.path().join("nothing-here");

    let result = ProjectAnalyzer::new(&gone, AnalyzerConfig::default());
    assert!(matches!(result, Err(AnalyzerError::InvalidPath(_))));
}

#[tokio::test]
async fn cancellation_stops_the_run() {
    let temp = tempdir().unwrap();
    fs::write(temp.path().join("a.js"), "function a() {}\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    analyzer.cancellation_token().cancel();

    let result = analyzer.analyze().await;
    assert!(matches!(result, Err(AnalyzerError::Cancelled)));
}

#[tokio::test]
async fn batches_cover_every_file() {
    let temp = tempdir().unwrap();
    for i in 0..12 {
        fs::write(
            temp.path().join(format!("file{i}.js")),
            format!("function f{i}() {{}}\n"),
        )
        .unwrap();
    }

    let config = AnalyzerConfig {
        batch_size: 5,
        batch_delay_ms: 1,
        ..Default::default()
    };
    let mut analyzer = ProjectAnalyzer::new(temp.path(), config).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    assert_eq!(analysis.modules.len(), 12);
    assert_eq!(analysis.stats.files, 12);
    assert_eq!(analysis.primary_language, "javascript");
}

#[tokio::test]
async fn architecture_files_are_reported() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("src/routes")).unwrap();
    fs::write(temp.path().join("src/index.js"), "function main() {}\n").unwrap();
    fs::write(
        temp.path().join("src/routes/users.js"),
        "function users() {}\n",
    )
    .unwrap();
    fs::write(temp.path().join("src/misc.js"), "function misc() {}\n").unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    assert_eq!(
        analysis.architecture_files,
        vec!["src/index.js", "src/routes/users.js"]
    );
}

#[tokio::test]
async fn serialized_output_is_valid_json() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("mod.js"),
        "import { x } from './x';\nexport function run() {}\n",
    )
    .unwrap();

    let mut analyzer = ProjectAnalyzer::new(temp.path(), AnalyzerConfig::default()).unwrap();
    let analysis = analyzer.analyze().await.unwrap();

    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["modules"][0]["strategy"], "direct");
    assert_eq!(json["modules"][0]["total_functions"], 1);
    assert!(json["stats"]["time_ms"].as_u64().unwrap() >= 1);
}
