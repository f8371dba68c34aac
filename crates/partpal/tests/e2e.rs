// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete partpal pipeline.
//!
//! Each test creates an isolated TestHarness with mock collaborators. Tests
//! are independent and order-insensitive.

use std::time::Duration;

use partpal_agent::{IMAGE_UPLOADED, NO_MATCHING_PARTS};
use partpal_core::{AssistantPayload, PartResult, Turn};
use partpal_test_utils::{MockCatalog, MockGeneration, MockSpeech, TestHarness};

fn mouser_part(mpn: &str, price: &str) -> PartResult {
    PartResult::from_upstream(
        Some(mpn.to_string()),
        Some("8-bit Microcontrollers - MCU".to_string()),
        Some(price.to_string()),
        Some(format!("https://www.mouser.com/ProductDetail/{mpn}")),
    )
}

// ---- Image action ----

#[tokio::test]
async fn identified_component_yields_identity_turn_then_parts_turn() {
    let parts = vec![
        mouser_part("ATMEGA328P-PU", "$2.89"),
        mouser_part("ATMEGA328P-AU", "$2.65"),
    ];
    let mut harness = TestHarness::builder()
        .with_replies(vec!["<b>ATMEGA328P</b>\n".to_string()])
        .with_parts(parts.clone())
        .with_audio(vec![0xFF, 0xFB])
        .build();

    let turns = harness.send_image(b"\x89PNG\r\n\x1a\nfake").await.unwrap();

    assert_eq!(
        turns,
        vec![
            Turn::new(
                Some(IMAGE_UPLOADED.to_string()),
                AssistantPayload::text("Identified: ATMEGA328P"),
                Some(vec![0xFF, 0xFB]),
            ),
            Turn::assistant_only(AssistantPayload::parts_only(parts)),
        ]
    );
    assert_eq!(
        harness.catalog.last_keyword().await.as_deref(),
        Some("ATMEGA328P")
    );
    assert_eq!(
        harness.speech.last_text().await.as_deref(),
        Some("Identified: ATMEGA328P")
    );
}

#[tokio::test]
async fn identified_component_without_hits_says_so() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["LM7805".to_string()])
        .build();

    let turns = harness.send_image(b"jpeg bytes").await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].assistant().body(), Some(NO_MATCHING_PARTS));
}

#[tokio::test]
async fn vision_failure_is_the_only_turn() {
    let mut harness = TestHarness::builder()
        .with_generation(MockGeneration::failing("quota exceeded"))
        .build();

    let turns = harness.send_image(b"jpeg bytes").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].user(), Some(IMAGE_UPLOADED));
    assert_eq!(
        turns[0].assistant().body(),
        Some("Image recognition error: quota exceeded")
    );
    assert_eq!(harness.catalog.calls(), 0);
    assert_eq!(harness.speech.calls(), 0);
}

// ---- Text action ----

#[tokio::test]
async fn text_action_combines_reply_parts_and_audio() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["Use an <i>ESP32</i>. Thank you!".to_string()])
        .with_parts(vec![mouser_part("ESP32-WROOM-32E", "$3.10")])
        .with_audio(vec![1, 2, 3])
        .build();

    let turns = harness.send_text("wifi weather station").await.unwrap();
    assert_eq!(turns.len(), 1);

    let turn = &turns[0];
    assert_eq!(turn.user(), Some("wifi weather station"));
    assert_eq!(turn.assistant().body(), Some("Use an ESP32. Thank you!"));
    assert_eq!(turn.assistant().parts().len(), 1);
    assert_eq!(turn.audio(), Some(&[1u8, 2, 3][..]));
    assert_eq!(
        harness.catalog.last_keyword().await.as_deref(),
        Some("wifi weather station")
    );
}

#[tokio::test]
async fn generation_failure_still_yields_a_turn_with_parts() {
    let mut harness = TestHarness::builder()
        .with_generation(MockGeneration::failing("connection reset"))
        .with_parts(vec![mouser_part("LM7805CT", "$0.71")])
        .build();

    let turns = harness.send_text("5V regulator").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].assistant().body(), Some("Error: connection reset"));
    assert_eq!(turns[0].assistant().parts().len(), 1);
}

#[tokio::test]
async fn catalog_and_speech_failures_are_absorbed() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["A 10k pull-up works.".to_string()])
        .with_catalog(MockCatalog::failing("503"))
        .with_speech(MockSpeech::failing("quota"))
        .build();

    let turns = harness.send_text("i2c pull-ups").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert_eq!(turns[0].assistant().body(), Some("A 10k pull-up works."));
    assert!(turns[0].assistant().parts().is_empty());
    assert!(turns[0].audio().is_none());
}

#[tokio::test]
async fn unconfigured_services_behave_as_empty() {
    let mut harness = TestHarness::builder()
        .with_replies(vec!["Try an Arduino Nano.".to_string()])
        .without_catalog()
        .without_speech()
        .build();

    let turns = harness.send_text("small robot").await.unwrap();
    assert_eq!(turns.len(), 1);
    assert!(turns[0].assistant().parts().is_empty());
    assert!(turns[0].audio().is_none());
    assert_eq!(harness.catalog.calls(), 0);
    assert_eq!(harness.speech.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn slow_generation_times_out_into_an_error_turn() {
    let mut harness = TestHarness::builder()
        .with_generation(MockGeneration::new().with_delay(Duration::from_secs(60)))
        .with_call_timeout(Duration::from_secs(5))
        .build();

    let turns = harness.send_text("hello").await.unwrap();
    assert_eq!(
        turns[0].assistant().body(),
        Some("Error: no response within 5s")
    );
}

// ---- Transcript ----

#[tokio::test]
async fn transcript_accumulates_in_action_order() {
    let mut harness = TestHarness::builder()
        .with_replies(vec![
            "First answer.".to_string(),
            "NE555".to_string(),
            "Second answer.".to_string(),
        ])
        .build();

    harness.send_text("first").await.unwrap();
    harness.send_image(b"photo").await.unwrap();
    harness.send_text("second").await.unwrap();

    let users: Vec<Option<String>> = harness
        .turns()
        .iter()
        .map(|t| t.user().map(str::to_string))
        .collect();
    assert_eq!(
        users,
        vec![
            Some("first".to_string()),
            Some(IMAGE_UPLOADED.to_string()),
            None,
            Some("second".to_string()),
        ]
    );
}

#[tokio::test]
async fn blank_text_leaves_transcript_untouched() {
    let mut harness = TestHarness::builder().build();

    let turns = harness.send_text("   \n").await.unwrap();
    assert!(turns.is_empty());
    assert!(harness.turns().is_empty());
    assert_eq!(harness.generation.stream_calls(), 0);
}

#[tokio::test]
async fn reset_clears_transcript() {
    let mut harness = TestHarness::builder().build();
    harness.send_text("hello").await.unwrap();
    assert_eq!(harness.turns().len(), 1);

    harness.session.reset();
    assert!(harness.turns().is_empty());
}
