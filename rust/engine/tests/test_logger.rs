use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use bjtrain_engine::cards::{Card, Rank as R, Suit as S};
use bjtrain_engine::hand::Hand;
use bjtrain_engine::logger::{RoundLogger, RoundRecord};
use bjtrain_engine::rules::Rules;
use bjtrain_engine::strategy::Action;
use bjtrain_engine::trainer::Trainer;

fn temp_log(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    std::env::temp_dir().join(format!("bjtrain-{name}-{stamp}.jsonl"))
}

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

#[test]
fn writes_one_json_line_per_record() {
    let path = temp_log("log-lines");
    let mut logger = RoundLogger::create(&path).unwrap();
    for i in 0..3 {
        logger
            .write(&RoundRecord {
                hand: "10♥ 6♣ (16)".to_string(),
                hand_key: "16".to_string(),
                dealer: "10".to_string(),
                player_action: "R".to_string(),
                correct_action: "R".to_string(),
                is_correct: true,
                exception: None,
                correct: i + 1,
                total: i + 1,
                ts: None,
            })
            .unwrap();
    }

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in &lines {
        let record: RoundRecord = serde_json::from_str(line).unwrap();
        assert_eq!(record.hand_key, "16");
        assert!(record.ts.is_some(), "timestamp injected at write time");
    }

    let _ = fs::remove_file(&path);
}

#[test]
fn reopening_an_existing_log_appends() {
    let path = temp_log("log-append");
    fs::write(&path, "{\"prior\":\"session\"}\n").unwrap();

    let mut logger = RoundLogger::create(&path).unwrap();
    logger
        .write(&RoundRecord {
            hand: "8♥ 8♣ (16)".to_string(),
            hand_key: "88".to_string(),
            dealer: "10".to_string(),
            player_action: "P".to_string(),
            correct_action: "P".to_string(),
            is_correct: true,
            exception: None,
            correct: 1,
            total: 1,
            ts: None,
        })
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2, "earlier rounds survive: {text}");
    assert!(lines[0].contains("prior"));
    let record: RoundRecord = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(record.hand_key, "88");

    let _ = fs::remove_file(&path);
}

#[test]
fn preserves_an_explicit_timestamp() {
    let path = temp_log("log-ts");
    let mut logger = RoundLogger::create(&path).unwrap();
    logger
        .write(&RoundRecord {
            hand: "A♥ 7♣ (18)".to_string(),
            hand_key: "A7".to_string(),
            dealer: "9".to_string(),
            player_action: "H".to_string(),
            correct_action: "H".to_string(),
            is_correct: true,
            exception: None,
            correct: 1,
            total: 1,
            ts: Some("2026-01-01T00:00:00Z".to_string()),
        })
        .unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let record: RoundRecord = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(record.ts.as_deref(), Some("2026-01-01T00:00:00Z"));

    let _ = fs::remove_file(&path);
}

#[test]
fn attached_logger_records_answered_rounds() {
    let path = temp_log("log-trainer");
    let mut trainer = Trainer::with_seed(Rules::default(), &data_dir(), 42).unwrap();
    trainer.attach_logger(RoundLogger::create(&path).unwrap());

    trainer.set_hand(
        Hand::from_cards(vec![
            Card::new(R::Ten, S::Hearts),
            Card::new(R::Six, S::Clubs),
        ]),
        Card::new(R::Five, S::Spades),
    );
    trainer.check_answer(Action::Stand).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let record: RoundRecord = serde_json::from_str(text.trim()).unwrap();
    assert_eq!(record.hand_key, "16");
    assert_eq!(record.dealer, "5");
    assert_eq!(record.player_action, "S");
    assert!(record.is_correct);
    assert_eq!(record.total, 1);

    let _ = fs::remove_file(&path);
}
