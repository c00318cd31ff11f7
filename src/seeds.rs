//! Seed data and small utilities related to default content.

use chrono::TimeZone;
use chrono::Utc;

use crate::domain::{
    BlankItem, DialogueLine, LessonRecord, QuizQuestion, Slide, TargetGroup, VocabWord,
};

/// Minimal set of built-in lessons that guarantee the export endpoints are
/// useful without external config. The first lesson deliberately carries one
/// slide of every kind, which the export tests lean on.
pub fn seed_lessons() -> Vec<LessonRecord> {
    vec![
        LessonRecord {
            id: "l-daily-routines".into(),
            title: "Daily Routines".into(),
            target_group: TargetGroup::Teens,
            teacher_notes: Some(
                "Warm up with the vocabulary table before the exercise; keep the dialogue for pair work."
                    .into(),
            ),
            slides: vec![
                Slide::Vocabulary {
                    title: "Morning words".into(),
                    words: vec![
                        VocabWord {
                            word: "wake up".into(),
                            translation: "despertarse".into(),
                            example: Some("I wake up at seven.".into()),
                        },
                        VocabWord {
                            word: "breakfast".into(),
                            translation: "desayuno".into(),
                            example: None,
                        },
                        VocabWord {
                            word: "commute".into(),
                            translation: "trayecto".into(),
                            example: Some("My commute takes an hour.".into()),
                        },
                    ],
                },
                Slide::Grammar {
                    title: "Present simple for habits".into(),
                    explanation: "Use the present simple for routines and repeated actions. Third person singular adds -s.".into(),
                    examples: vec![
                        "She wakes up at six.".into(),
                        "They take the bus every day.".into(),
                    ],
                },
                Slide::Exercise {
                    title: "Fill the gaps".into(),
                    instructions: "Complete each sentence with the present simple form.".into(),
                    items: vec![
                        BlankItem {
                            sentence: "She __ to school by bike.".into(),
                            answer: "goes".into(),
                        },
                        BlankItem {
                            sentence: "He [blank] breakfast at eight.".into(),
                            answer: "eats".into(),
                        },
                        BlankItem {
                            sentence: "They [___] TV in the evening.".into(),
                            answer: "watch".into(),
                        },
                    ],
                },
                Slide::Quiz {
                    title: "Quick check".into(),
                    questions: vec![QuizQuestion {
                        prompt: "Which sentence is correct?".into(),
                        options: vec![
                            "She go to work early.".into(),
                            "She goes to work early.".into(),
                            "She going to work early.".into(),
                        ],
                        correct: 1,
                    }],
                },
                Slide::Dialogue {
                    title: "At the bus stop".into(),
                    lines: vec![
                        DialogueLine {
                            speaker: "Maya".into(),
                            text: "Do you always catch the 7:15 bus?".into(),
                        },
                        DialogueLine {
                            speaker: "Leo".into(),
                            text: "Usually, unless I oversleep!".into(),
                        },
                    ],
                },
            ],
            created_at: Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).single().unwrap_or(chrono::DateTime::UNIX_EPOCH),
        },
        LessonRecord {
            id: "l-ordering-food".into(),
            title: "Ordering Food".into(),
            target_group: TargetGroup::Adults,
            teacher_notes: None,
            slides: vec![
                Slide::Vocabulary {
                    title: "Restaurant phrases".into(),
                    words: vec![
                        VocabWord {
                            word: "the bill".into(),
                            translation: "la cuenta".into(),
                            example: Some("Could we have the bill, please?".into()),
                        },
                        VocabWord {
                            word: "starter".into(),
                            translation: "entrante".into(),
                            example: None,
                        },
                    ],
                },
                Slide::Dialogue {
                    title: "Taking an order".into(),
                    lines: vec![
                        DialogueLine {
                            speaker: "Waiter".into(),
                            text: "Are you ready to order?".into(),
                        },
                        DialogueLine {
                            speaker: "Guest".into(),
                            text: "Yes, I'll have the soup to start.".into(),
                        },
                    ],
                },
            ],
            created_at: Utc.with_ymd_and_hms(2024, 9, 9, 8, 0, 0).single().unwrap_or(chrono::DateTime::UNIX_EPOCH),
        },
    ]
}
