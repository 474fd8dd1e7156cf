use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tortoise_frontend::audio::{read_wav, write_wav};
use tortoise_frontend::{
    AudioData, CONDITIONING_SAMPLE_RATE, DirectoryVoiceStore, FrontendConfig, LongformRequest,
    ModelInfo, OUTPUT_SAMPLE_RATE, Preset, SpeechModel, SpeechSession, SplitMode,
    SynthesisOutput, SynthesisRequest, VoiceOption, VoiceStore,
};

/// Emits one 0.1 s clip per request whose level is the number of reference clips.
#[derive(Default)]
struct CountingModel {
    seen: Mutex<Vec<(String, usize)>>,
}

#[async_trait]
impl SpeechModel for CountingModel {
    async fn tts_with_preset(
        &self,
        request: SynthesisRequest,
    ) -> tortoise_frontend::FrontendResult<SynthesisOutput> {
        let clips = request.voice_samples.as_ref().map_or(0, |s| s.len());
        self.seen.lock().unwrap().push((request.text.clone(), clips));
        Ok(SynthesisOutput {
            candidates: vec![AudioData::mono(
                vec![clips as f32 / 10.0; (OUTPUT_SAMPLE_RATE / 10) as usize],
                OUTPUT_SAMPLE_RATE,
            )],
            seed: None,
        })
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo {
            id: "counting".to_string(),
            name: "Counting model".to_string(),
            description: None,
        }
    }
}

fn write_clip(dir: &Path, voice: &str, file: &str, sample_rate: u32) {
    let clip = AudioData {
        samples: vec![0.1; 200],
        channels: 2,
        sample_rate,
    };
    write_wav(dir.join(voice).join(file), &clip).unwrap();
}

fn setup() -> (TempDir, Arc<CountingModel>, SpeechSession) {
    let _ = env_logger::builder().is_test(true).try_init();

    let dir = TempDir::new().unwrap();
    let voices = dir.path().join("voices");
    write_clip(&voices, "tom", "1.wav", CONDITIONING_SAMPLE_RATE);
    write_clip(&voices, "tom", "2.wav", 44_100);
    write_clip(&voices, "emma", "1.wav", CONDITIONING_SAMPLE_RATE);
    std::fs::create_dir_all(voices.join("not_a_voice")).unwrap();

    let config = FrontendConfig {
        voice_dirs: vec![voices],
        output_dir: dir.path().join("outputs"),
        longform_dir: dir.path().join("longform"),
        run_log: dir.path().join("runs.log"),
        script_log: dir.path().join("scripts.log"),
        ..FrontendConfig::default()
    };
    let model = Arc::new(CountingModel::default());
    let store = Arc::new(DirectoryVoiceStore::new(config.voice_dirs.clone()));
    let session = SpeechSession::new(model.clone(), store, config);
    (dir, model, session)
}

#[tokio::test]
async fn test_store_lists_voices_on_disk() {
    let (_dir, _model, session) = setup();
    assert_eq!(
        session.store().available_voices(),
        vec![VoiceOption::Tom, VoiceOption::Emma]
    );
}

#[tokio::test]
async fn test_longform_with_directory_voices() {
    let (dir, model, session) = setup();

    let script = dir.path().join("chapter.txt");
    std::fs::write(&script, "The tortoise set off at dawn.\n\nThe hare slept.\n").unwrap();

    let request = LongformRequest {
        text: None,
        script: Some(script),
        voice: VoiceOption::Tom,
        voice_b: VoiceOption::Emma,
        preset: Preset::UltraFast,
        seed: Some(3),
        split: SplitMode::Newline,
        ..LongformRequest::new("chapter", "")
    };
    let output = session.longform(request).await.unwrap();

    assert_eq!(
        output.passages,
        vec!["The tortoise set off at dawn.", "The hare slept."]
    );
    // tom contributes two clips, emma one
    assert!(model.seen.lock().unwrap().iter().all(|(_, clips)| *clips == 3));

    let combined = read_wav(&output.output_path).unwrap();
    assert_eq!(combined.sample_rate, OUTPUT_SAMPLE_RATE);
    assert!((combined.duration_secs() - 0.2).abs() < 1e-9);
    assert!(dir.path().join("longform/chapter/2.wav").is_file());

    let log = std::fs::read_to_string(dir.path().join("scripts.log")).unwrap();
    assert!(log.contains("| Voice: tom,emma |"));
    assert!(log.contains("| Quality: ultra_fast |"));
    assert!(log.trim_end().ends_with("Seed: 3"));
}

#[tokio::test]
async fn test_unknown_voice_is_reported() {
    let (_dir, model, session) = setup();
    let request = LongformRequest {
        voice: VoiceOption::Freeman,
        ..LongformRequest::new("missing", "Hello there.")
    };

    let err = session.longform(request).await.unwrap_err();
    assert!(matches!(err, tortoise_frontend::FrontendError::VoiceNotFound(_)));
    assert!(model.seen.lock().unwrap().is_empty());
}
