//! End-to-end detection and configuration against mock peripherals.

mod common;

use common::{APLAY_DAC, APLAY_DACPLUSDSP, APLAY_DACPLUSPRO, Appliance, count_lines};
use configurator_hardware::devices::Peripherals;
use configurator_hardware::mock::{
    MockAudioDevices, MockDspService, MockHatReader, MockI2cBus, MockMixerControls,
    MockSystemControl,
};
use configurator_soundcard::{CardCatalog, DetectionSource};

const STOCK_CONFIG: &str = "# For more options see config.txt documentation\n\
    dtparam=audio=on\n\
    camera_auto_detect=1\n\
    dtoverlay=vc4-kms-v3d\n\
    [all]\n";

#[test]
fn test_save_without_mutation_never_writes() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let mut config = appliance.load_config();
    let checksum = config.checksum();

    assert!(!config.save().unwrap());
    assert!(!config.save().unwrap());

    assert!(!appliance.backup_path().exists());
    assert_eq!(appliance.config_on_disk(), STOCK_CONFIG);
    assert_eq!(config.checksum(), checksum);
}

#[test]
fn test_backup_written_once() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let mut config = appliance.load_config();

    config.set_onboard_sound(false);
    assert!(config.save().unwrap());
    config.set_spi(true);
    assert!(config.save().unwrap());

    let backup = std::fs::read_to_string(appliance.backup_path()).unwrap();
    assert_eq!(backup, STOCK_CONFIG);
    let on_disk = appliance.config_on_disk();
    assert!(on_disk.contains("dtparam=audio=off\n"));
    assert!(on_disk.contains("dtparam=spi=on\n"));
}

#[test]
fn test_upsert_twice_leaves_one_line() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let mut config = appliance.load_config();

    config.upsert_line_by_prefix("dtparam=audio=", "dtparam=audio=on\n");
    config.upsert_line_by_prefix("dtparam=audio=", "dtparam=audio=off\n");

    let matching: Vec<_> = config
        .lines()
        .filter(|line| line.starts_with("dtparam=audio="))
        .collect();
    assert_eq!(matching, vec!["dtparam=audio=off"]);
}

#[test]
fn test_overlay_resolution_prefers_hatless_profiles() {
    let catalog = CardCatalog::global();

    let hatless = catalog.profiles_for_overlay("dacplus-std", true);
    assert!(!hatless.is_empty());
    assert!(hatless.iter().all(|profile| profile.hat_name.is_none()));

    let only_hat = catalog.profiles_for_overlay("dacplusdsp", true);
    assert_eq!(only_hat, catalog.profiles_for_overlay("dacplusdsp", false));
    assert!(only_hat.iter().all(|profile| profile.hat_name.is_some()));
}

#[tokio::test(start_paused = true)]
async fn test_hat_short_circuits_other_sources() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let i2c = MockI2cBus::new().with_register(1, 0x4a, 25, 0x07);
    let audio = MockAudioDevices::new(APLAY_DACPLUSDSP);
    let dsp = MockDspService::detected("ADAU1451");
    let (i2c_calls, audio_calls, dsp_calls) = (i2c.calls(), audio.calls(), dsp.calls());

    let peripherals = Peripherals::mock()
        .with_hat(MockHatReader::with_product("DAC2 Pro"))
        .with_i2c(i2c)
        .with_audio(audio)
        .with_dsp(dsp);
    let mut service = appliance.service(peripherals);

    let result = service.detect_card().await.unwrap();

    assert_eq!(result.name(), Some("DAC2 Pro"));
    assert_eq!(result.overlay(), Some("dacplus-pro"));
    assert_eq!(result.source(), DetectionSource::HatEeprom);
    assert_eq!(i2c_calls.count(), 0);
    assert_eq!(audio_calls.count(), 0);
    assert_eq!(dsp_calls.count(), 0);
    // I2C was never enabled
    assert_eq!(appliance.config_on_disk(), STOCK_CONFIG);
}

#[tokio::test(start_paused = true)]
async fn test_failed_validation_falls_through_to_i2c() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let hat = MockHatReader::with_product("DAC+ DSP");
    let i2c = MockI2cBus::new().with_register(1, 0x4a, 25, 0x07);
    let audio = MockAudioDevices::new(APLAY_DACPLUSDSP);
    let audio_calls = audio.calls();

    let peripherals = Peripherals::mock()
        .with_hat(hat)
        .with_i2c(i2c)
        .with_audio(audio)
        .with_dsp(MockDspService::not_detected());
    let mut service = appliance.service(peripherals);

    let result = service.detect_card().await.unwrap();

    assert_eq!(result.source(), DetectionSource::I2cProbe);
    assert_eq!(result.overlay(), Some("dacplusadcpro"));
    assert_eq!(result.name(), Some("DAC+ ADC Pro"));
    assert_eq!(audio_calls.count(), 0);
    assert_eq!(count_lines(&appliance.config_on_disk(), "dtparam=i2c_arm=on"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_config_comment_overrides_detection() {
    let appliance = Appliance::with_config(
        "dtparam=audio=off\n# HiFiBerry card: DAC2 Pro\ndtoverlay=hifiberry-dacplus-pro\n",
    );
    let hat = MockHatReader::with_product("Amp3");
    let i2c = MockI2cBus::new();
    let dsp = MockDspService::detected("ADAU1451");
    let (hat_calls, i2c_calls, dsp_calls) = (hat.calls(), i2c.calls(), dsp.calls());

    let peripherals = Peripherals::mock()
        .with_hat(hat)
        .with_i2c(i2c)
        .with_audio(MockAudioDevices::new(APLAY_DACPLUSPRO))
        .with_dsp(dsp);
    let service = appliance.service(peripherals);

    let result = service.identify_current_card().await;

    assert_eq!(result.name(), Some("DAC2 Pro"));
    assert_eq!(result.source(), DetectionSource::ConfigComment);
    assert_eq!(hat_calls.count(), 0);
    assert_eq!(i2c_calls.count(), 0);
    assert_eq!(dsp_calls.count(), 0);
}

#[tokio::test]
async fn test_config_comment_pins_pcm5102_card() {
    let appliance = Appliance::with_config("# HiFiBerry card: DAC+ Light\ndtoverlay=hifiberry-dac\n");
    let hat = MockHatReader::absent();
    let hat_calls = hat.calls();
    let peripherals = Peripherals::mock()
        .with_hat(hat)
        .with_audio(MockAudioDevices::new(APLAY_DAC));
    let service = appliance.service(peripherals);

    let info = service.card_info(false).await;

    assert_eq!(info.name, "DAC+ Light");
    assert_eq!(info.overlay.as_deref(), Some("dac"));
    assert_eq!(info.source, DetectionSource::ConfigComment);
    assert_eq!(hat_calls.count(), 0);
}

#[tokio::test]
async fn test_config_comment_rejected_when_overlay_differs() {
    let appliance =
        Appliance::with_config("# HiFiBerry card: DAC2 Pro\ndtoverlay=hifiberry-digi\n");
    let peripherals = Peripherals::mock().with_audio(MockAudioDevices::new(APLAY_DACPLUSPRO));
    let service = appliance.service(peripherals);
    let config = appliance.load_config();

    let pinned = service
        .identifier()
        .identify_from_config_comment(&config)
        .await;
    assert!(pinned.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_card_info_leaves_config_untouched() {
    let content = "dtparam=audio=off\ndtoverlay=hifiberry-digi\n";
    let appliance = Appliance::with_config(content);
    let i2c = MockI2cBus::new().with_register(1, 0x3b, 1, 0x88);
    let i2c_calls = i2c.calls();
    let service = appliance.service(Peripherals::mock().with_i2c(i2c));

    let info = service.card_info(false).await;

    assert_eq!(info.name, "Unknown");
    assert_eq!(i2c_calls.count(), 0);
    assert_eq!(appliance.config_on_disk(), content);
    assert!(!appliance.backup_path().exists());
}

#[tokio::test(start_paused = true)]
async fn test_aplay_detection_end_to_end() {
    let appliance = Appliance::with_config("");
    // The dacplusdsp overlay is only accepted when the DSP answers.
    let peripherals = Peripherals::mock()
        .with_audio(MockAudioDevices::new(APLAY_DACPLUSDSP))
        .with_dsp(MockDspService::detected("ADAU1451"));
    let mut service = appliance.service(peripherals);

    let result = service.detect_card().await.unwrap();
    assert_eq!(result.overlay(), Some("dacplusdsp"));
    assert_eq!(result.name(), Some("DAC+ DSP"));
    assert_eq!(result.source(), DetectionSource::AplayOutput);
    assert!(result.alternatives().is_empty());

    let outcome = service
        .configure_detected_card(&result, false, false)
        .await
        .unwrap();
    assert!(outcome.overlay_changed);

    let on_disk = appliance.config_on_disk();
    assert_eq!(count_lines(&on_disk, "dtoverlay=hifiberry-dacplusdsp"), 1);
    assert!(on_disk.contains("# HiFiBerry card: DAC+ DSP\ndtoverlay=hifiberry-dacplusdsp\n"));
    assert_eq!(
        appliance.reboot_marker().as_deref(),
        Some("Configuring DAC+ DSP requires a reboot.\n")
    );
    assert!(appliance.event_log().unwrap().contains("configured DAC+ DSP"));
}

#[tokio::test(start_paused = true)]
async fn test_aplay_dsp_overlay_rejected_without_dsp() {
    let appliance = Appliance::with_config("");
    let peripherals = Peripherals::mock().with_audio(MockAudioDevices::new(APLAY_DACPLUSDSP));
    let mut service = appliance.service(peripherals);

    let result = service.detect_card().await.unwrap();
    assert!(!result.is_detected());
    assert_eq!(result.display_name(), "Unknown");
}

#[tokio::test(start_paused = true)]
async fn test_fallback_profile_when_nothing_detected() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let mut service = appliance.service(Peripherals::mock());

    let result = service
        .detect_and_configure(true, Some("DAC+ Light"), false, false)
        .await
        .unwrap();

    assert_eq!(result.name(), Some("DAC+ Light"));
    assert_eq!(result.overlay(), Some("dac"));
    assert_eq!(result.source(), DetectionSource::Fallback);

    let on_disk = appliance.config_on_disk();
    assert_eq!(count_lines(&on_disk, "dtoverlay=hifiberry-dac"), 1);
    assert!(appliance.reboot_marker().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_nothing_detected_without_fallback_writes_no_overlay() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let mut service = appliance.service(Peripherals::mock());

    let result = service
        .detect_and_configure(true, None, false, false)
        .await
        .unwrap();

    assert!(!result.is_detected());
    assert!(appliance.reboot_marker().is_none());
    assert!(!appliance.config_on_disk().contains("hifiberry"));
}

#[tokio::test(start_paused = true)]
async fn test_second_run_is_idempotent() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let peripherals = || {
        Peripherals::mock()
            .with_audio(MockAudioDevices::new(APLAY_DACPLUSPRO))
            .with_mixer(MockMixerControls::new().with_controls(1, &["Digital", "Headphone"]))
    };

    let first = appliance
        .service(peripherals())
        .detect_and_configure(true, None, false, false)
        .await
        .unwrap();
    assert_eq!(first.name(), Some("DAC2 Pro"));
    let after_first = appliance.config_on_disk();
    std::fs::remove_file(&appliance.settings.reboot_file).unwrap();

    let second = appliance
        .service(peripherals())
        .detect_and_configure(true, None, false, false)
        .await
        .unwrap();

    assert_eq!(second.name(), Some("DAC2 Pro"));
    assert_eq!(second.source(), DetectionSource::AplayOutput);
    assert_eq!(appliance.config_on_disk(), after_first);
    assert!(appliance.reboot_marker().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_store_loads_overlay_and_reboots() {
    let appliance = Appliance::with_config(STOCK_CONFIG);
    let system = MockSystemControl::new();
    let peripherals = Peripherals::mock()
        .with_hat(MockHatReader::with_product("Amp100"))
        .with_system(system.clone());
    let mut service = appliance.service(peripherals);

    let result = service
        .detect_and_configure(true, None, true, true)
        .await
        .unwrap();

    assert_eq!(result.overlay(), Some("amp100,automute"));
    assert_eq!(
        system.loaded_overlays(),
        vec![("hifiberry-amp100".to_string(), vec!["automute".to_string()])]
    );
    assert_eq!(system.reboots().count(), 1);
}
