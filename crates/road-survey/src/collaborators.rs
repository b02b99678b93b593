//! Survey collaborators backed by the local filesystem and an external classifier program

use road_sample_lib::{
    Classification, Detection, ImageFetcher, ImageRequest, RegionClassifier, Result, SampleError,
    UNKNOWN_LABEL,
};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Serves photographs already downloaded into a directory
///
/// Files are looked up by [`ImageRequest::file_name`], the same name `--urls` output is
/// meant to be saved under.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ImageFetcher for DirectoryFetcher {
    fn fetch(&self, request: &ImageRequest) -> Result<PathBuf> {
        let path = self.dir.join(request.file_name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(SampleError::ImageFetch(format!(
                "{} has not been downloaded",
                path.display()
            )))
        }
    }
}

/// Runs `<program> <image> <index>` and reads the detection from its stdout
///
/// See [`parse_detection`] for the expected output.
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: PathBuf,
}

impl CommandClassifier {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl RegionClassifier for CommandClassifier {
    fn classify(&self, image: &Path, index: usize) -> Result<Detection> {
        let output = Command::new(&self.program)
            .arg(image)
            .arg(index.to_string())
            .output()
            .map_err(|e| {
                SampleError::Classification(format!(
                    "cannot run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(SampleError::Classification(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(parse_detection(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Parse classifier output
///
/// Line 1 is the label; empty or `unknown` means nothing was detected. An optional
/// non-empty line 2 is the path of a diagnostic plot.
pub fn parse_detection(stdout: &str) -> Detection {
    let mut lines = stdout.lines().map(str::trim);

    let classification = match lines.next() {
        None | Some("") => Classification::Unknown,
        Some(label) if label == UNKNOWN_LABEL => Classification::Unknown,
        Some(label) => Classification::Detected(label.to_string()),
    };
    let plot_path = lines.next().filter(|l| !l.is_empty()).map(PathBuf::from);

    Detection {
        classification,
        plot_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_sample_lib::ImageryConfig;
    use std::sync::Mutex;

    /// Held while writing scripts or spawning processes, so no child inherits a script
    /// that is still open for writing
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    /// Fresh scratch directory per test
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("road_survey_{}_{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_parse_detection() {
        assert_eq!(
            parse_detection("blue\n/tmp/plot_3.png\n"),
            Detection {
                classification: Classification::Detected("blue".to_string()),
                plot_path: Some(PathBuf::from("/tmp/plot_3.png")),
            }
        );
        assert_eq!(
            parse_detection("unknown\n").classification,
            Classification::Unknown
        );
        assert_eq!(parse_detection("").classification, Classification::Unknown);
        assert_eq!(parse_detection("  blue  \n\n").plot_path, None);
    }

    #[test]
    fn test_directory_fetcher() {
        let dir = scratch_dir("fetcher");
        let config = ImageryConfig::default();
        let present = ImageRequest::new(&config, 90.0, 40.5, -3.5);
        let missing = ImageRequest::new(&config, 270.0, 40.5, -3.5);
        std::fs::write(dir.join(present.file_name()), b"jpeg").unwrap();

        let fetcher = DirectoryFetcher::new(&dir);
        assert_eq!(
            fetcher.fetch(&present).unwrap(),
            dir.join("40.5_-3.5_heading_90.jpg")
        );
        assert!(matches!(
            fetcher.fetch(&missing),
            Err(SampleError::ImageFetch(_))
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_classifier_program() {
        let _lock = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let classifier = CommandClassifier::new("/nonexistent/classifier");
        assert!(matches!(
            classifier.classify(Path::new("image.jpg"), 0),
            Err(SampleError::Classification(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_classifier_runs_program() {
        use std::os::unix::fs::PermissionsExt;

        let _lock = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = scratch_dir("classifier");
        let script = dir.join("classify.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ncase \"$1\" in\n  *_heading_90.jpg) echo blue; echo \"plot_$2.png\" ;;\n  *) echo unknown ;;\nesac\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let classifier = CommandClassifier::new(&script);
        let detection = classifier
            .classify(Path::new("40.5_-3.5_heading_90.jpg"), 7)
            .unwrap();
        assert_eq!(
            detection.classification,
            Classification::Detected("blue".to_string())
        );
        assert_eq!(detection.plot_path, Some(PathBuf::from("plot_7.png")));

        let detection = classifier
            .classify(Path::new("40.5_-3.5_heading_270.jpg"), 8)
            .unwrap();
        assert!(detection.classification.is_unknown());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_survey_with_downloaded_images() {
        use geo::Coord;
        use road_sample_lib::{Sample, Survey};
        use std::os::unix::fs::PermissionsExt;

        let _lock = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = scratch_dir("survey");
        let script = dir.join("classify.sh");
        std::fs::write(
            &script,
            "#!/bin/sh\ncase \"$1\" in\n  *_heading_180.jpg) echo blue ;;\n  *) echo unknown ;;\nesac\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        // Only the rear-facing photograph of the first sample and the front of the second exist
        let config = ImageryConfig::default();
        for (heading, lat, lon) in [(180.0, 40.5, -3.5), (90.0, 41.0, -3.0)] {
            let request = ImageRequest::new(&config, heading, lat, lon);
            std::fs::write(dir.join(request.file_name()), b"jpeg").unwrap();
        }
        let samples = vec![
            Sample::new(0.0, Coord { x: -3.5, y: 40.5 }),
            Sample::new(90.0, Coord { x: -3.0, y: 41.0 }),
        ];

        let survey = Survey::new(
            config,
            DirectoryFetcher::new(&dir),
            CommandClassifier::new(&script),
        );
        let report = survey.run(&samples, |_, _| {});

        assert_eq!(report.len(), 2);
        assert_eq!(report.records[0].label, "blue");
        assert_eq!(report.records[0].heading, 180.0);
        assert_eq!(report.records[1].label, UNKNOWN_LABEL);
        assert_eq!(report.detected_count(), 1);
        assert_eq!(report.center(), Some((40.75, -3.25)));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
