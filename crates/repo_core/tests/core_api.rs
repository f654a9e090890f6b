use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use repo_core::codec::{CipherCodec, IV_LEN};
use repo_core::core_api::{Editor, PlayerUpgrades, SaveErrorKind, WorldRecord};
use repo_core::framing;
use repo_core::kdf::KeyDerivation;

fn temp_save_path(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("{prefix}_{}_{}.es3", std::process::id(), nanos))
}

fn fixture_json() -> String {
    r#"{
    "teamName": {"value": "Alpha"},
    "playerNames": {"value": {"p1": "Ann"}},
    "dictionaryOfDictionaries": {"value": {
        "playerHealth": {"p1": 100},
        "playerUpgradeHealth": {"p1": 0},
        "playerUpgradeStamina": {"p1": 0},
        "playerUpgradeExtraJump": {"p1": 0},
        "playerUpgradeLaunch": {"p1": 0},
        "playerUpgradeMapPlayerCount": {"p1": 0},
        "playerUpgradeSpeed": {"p1": 0},
        "playerUpgradeStrength": {"p1": 0},
        "playerUpgradeRange": {"p1": 0},
        "playerUpgradeThrow": {"p1": 0},
        "runStats": {
            "level": 3,
            "currency": 42,
            "lives": 2,
            "chargingStationCharge": 1,
            "totalHaul": 1200
        }
    }}
}"#
    .to_string()
}

fn write_fixture_container(prefix: &str) -> PathBuf {
    let codec = CipherCodec::new(KeyDerivation::game_default());
    let container = codec.encrypt(fixture_json().as_bytes());
    let path = temp_save_path(prefix);
    fs::write(&path, container).expect("failed to write fixture container");
    path
}

#[test]
fn open_edit_save_reopen_round_trips() {
    let path = write_fixture_container("core_e2e");
    let saved = temp_save_path("core_e2e_out");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");
    assert!(editor.is_loaded());

    let world = editor
        .world()
        .expect("world query should succeed")
        .expect("world data should be available");
    assert_eq!(world.team_name, "Alpha");

    let roster = editor.players().expect("player query should succeed");
    assert_eq!(roster.players.len(), 1);
    assert_eq!(roster.players[0].health, 100);
    assert_eq!(roster.players[0].upgrades, PlayerUpgrades::default());

    editor
        .update_player("p1", 150, &PlayerUpgrades::uniform(1))
        .expect("player update should succeed");
    editor.save_file(&saved).expect("save should succeed");

    let mut reopened = Editor::new();
    reopened.open_save_file(&saved).expect("reopen should succeed");
    let roster = reopened.players().expect("player query should succeed");
    assert_eq!(roster.players[0].health, 150);
    assert_eq!(roster.players[0].upgrades, PlayerUpgrades::uniform(1));

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(saved);
}

#[test]
fn world_update_round_trips_through_disk() {
    let path = write_fixture_container("core_world");
    let saved = temp_save_path("core_world_out");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");

    let record = WorldRecord {
        team_name: "Beta".to_string(),
        level: 10,
        currency: 999,
        lives: 4,
        charging_station: 2,
        total_haul: 5000,
    };
    editor.update_world(&record).expect("world update should succeed");
    editor.save_file(&saved).expect("save should succeed");

    let mut reopened = Editor::new();
    reopened.open_save_file(&saved).expect("reopen should succeed");
    assert_eq!(
        reopened
            .world()
            .expect("world query should succeed")
            .expect("world data should be available"),
        record
    );

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(saved);
}

#[test]
fn compressed_save_is_gzip_framed_and_reopens() {
    let path = write_fixture_container("core_gzip");
    let saved = temp_save_path("core_gzip_out");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");
    editor
        .save_file_compressed(&saved)
        .expect("compressed save should succeed");

    // The decrypted plaintext carries the gzip magic bytes.
    let codec = CipherCodec::new(KeyDerivation::game_default());
    let container = fs::read(&saved).expect("failed to read saved container");
    let plaintext = codec.decrypt(&container).expect("decrypt should succeed");
    assert!(framing::is_gzip_framed(&plaintext));

    // Decompression is automatic on read.
    let mut reopened = Editor::new();
    reopened.open_save_file(&saved).expect("reopen should succeed");
    assert_eq!(
        reopened
            .world()
            .expect("world query should succeed")
            .expect("world data should be available")
            .team_name,
        "Alpha"
    );

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(saved);
}

#[test]
fn flipping_any_ciphertext_byte_is_detected() {
    let codec = CipherCodec::new(KeyDerivation::game_default());
    let container = codec.encrypt(fixture_json().as_bytes());
    let path = temp_save_path("core_tamper");

    for index in IV_LEN..container.len() {
        let mut tampered = container.clone();
        tampered[index] ^= 0xff;
        fs::write(&path, &tampered).expect("failed to write tampered container");

        let mut editor = Editor::new();
        let err = editor
            .open_save_file(&path)
            .expect_err("tampered container should never load");
        assert!(
            matches!(
                err.kind,
                SaveErrorKind::Decode | SaveErrorKind::MalformedDocument
            ),
            "byte {index}: unexpected error {err}"
        );
        assert!(!editor.is_loaded());
    }

    let _ = fs::remove_file(path);
}

#[test]
fn wrong_passphrase_fails_to_open() {
    let path = write_fixture_container("core_wrong_pass");

    let mut editor = Editor::with_passphrase("not the game passphrase");
    let err = editor
        .open_save_file(&path)
        .expect_err("wrong passphrase should never load");
    assert!(matches!(
        err.kind,
        SaveErrorKind::Decode | SaveErrorKind::MalformedDocument
    ));
    assert!(!editor.is_loaded());

    let _ = fs::remove_file(path);
}

#[test]
fn missing_file_is_an_io_error_and_leaves_editor_unloaded() {
    let mut editor = Editor::new();
    let err = editor
        .open_save_file(temp_save_path("core_missing"))
        .expect_err("missing file should fail");
    assert_eq!(err.kind, SaveErrorKind::Io);
    assert!(!editor.is_loaded());
}

#[test]
fn failed_open_keeps_the_previously_loaded_document() {
    let path = write_fixture_container("core_keep_prior");
    let garbage = temp_save_path("core_keep_prior_garbage");
    fs::write(&garbage, b"definitely not a container").expect("failed to write garbage");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");
    editor
        .open_save_file(&garbage)
        .expect_err("garbage should fail to open");

    assert!(editor.is_loaded());
    assert_eq!(
        editor
            .world()
            .expect("world query should succeed")
            .expect("world data should be available")
            .team_name,
        "Alpha"
    );

    let _ = fs::remove_file(path);
    let _ = fs::remove_file(garbage);
}

#[test]
fn unloaded_editor_rejects_every_document_operation() {
    let mut editor = Editor::new();
    assert!(!editor.is_loaded());

    assert_eq!(
        editor.world().expect_err("world needs a document").kind,
        SaveErrorKind::NoDocument
    );
    assert_eq!(
        editor.players().expect_err("players needs a document").kind,
        SaveErrorKind::NoDocument
    );
    assert_eq!(
        editor
            .update_player("p1", 100, &PlayerUpgrades::default())
            .expect_err("update_player needs a document")
            .kind,
        SaveErrorKind::NoDocument
    );
    assert_eq!(
        editor
            .save_file(temp_save_path("core_unloaded"))
            .expect_err("save needs a document")
            .kind,
        SaveErrorKind::NoDocument
    );
}

#[test]
fn facade_update_rejects_invalid_mutations_and_leaves_document_unchanged() {
    let path = write_fixture_container("core_validate");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");

    let err = editor
        .update_player("p1", 201, &PlayerUpgrades::default())
        .expect_err("health 201 should be rejected");
    assert_eq!(err.kind, SaveErrorKind::Validation);

    let err = editor
        .update_player("ghost", 100, &PlayerUpgrades::default())
        .expect_err("unknown id should be rejected");
    assert_eq!(err.kind, SaveErrorKind::Validation);

    let mut bad_world = WorldRecord {
        team_name: "Alpha".to_string(),
        level: 0,
        currency: 0,
        lives: 0,
        charging_station: 0,
        total_haul: 0,
    };
    let err = editor
        .update_world(&bad_world)
        .expect_err("level 0 should be rejected");
    assert_eq!(err.kind, SaveErrorKind::Validation);
    bad_world.level = 1;
    bad_world.team_name.clear();
    let err = editor
        .update_world(&bad_world)
        .expect_err("empty team name should be rejected");
    assert_eq!(err.kind, SaveErrorKind::Validation);

    // Nothing was mutated by the rejected updates.
    let roster = editor.players().expect("player query should succeed");
    assert_eq!(roster.players[0].health, 100);
    assert_eq!(
        editor
            .world()
            .expect("world query should succeed")
            .expect("world data should be available")
            .level,
        3
    );

    let _ = fs::remove_file(path);
}

#[test]
fn partial_schema_loads_with_unavailable_world() {
    let codec = CipherCodec::new(KeyDerivation::game_default());
    let plaintext = br#"{
        "teamName": {"value": "Alpha"},
        "playerNames": {"value": {"p1": "Ann"}}
    }"#;
    let path = temp_save_path("core_partial");
    fs::write(&path, codec.encrypt(plaintext)).expect("failed to write fixture container");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");

    assert!(editor.world().expect("world query should succeed").is_none());
    assert!(editor.file_info().expect("info query should succeed").is_none());
    let roster = editor.players().expect("player query should succeed");
    assert!(roster.players.is_empty());
    assert_eq!(roster.skipped.len(), 1);

    let _ = fs::remove_file(path);
}

#[test]
fn dump_plaintext_matches_serialized_document() {
    let path = write_fixture_container("core_dump");

    let mut editor = Editor::new();
    editor.open_save_file(&path).expect("open should succeed");

    let dump = editor.dump_plaintext().expect("dump should succeed");
    assert!(dump.starts_with("{\n    \"teamName\""));
    assert!(dump.contains("\"Alpha\""));

    let _ = fs::remove_file(path);
}
