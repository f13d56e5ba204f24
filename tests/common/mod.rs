//! Shared fixtures for integration tests: a tiny hand-built corpus and an
//! audio sink that records every command it receives.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use noble_quran::{AudioSink, Ayah, ContentIndex, SinkEvent, Surah, SurahMeta};

pub const INTRO_URL: &str = "https://audio.test/intro.mp3";

pub fn audio_for(global: u32) -> String {
    format!("https://audio.test/{global}.mp3")
}

/// Build one chapter whose verses carry the given `(juz, ruku)` tags. Global
/// identities start at `first_global`.
pub fn chapter(number: u16, first_global: u32, tags: &[(u8, u16)]) -> Surah {
    let ayahs: Vec<Ayah> = tags
        .iter()
        .enumerate()
        .map(|(idx, &(juz, ruku))| {
            let global = first_global + idx as u32;
            Ayah {
                id: global,
                ayah_number: (idx + 1) as u16,
                text_arabic: format!("arabic {number}:{}", idx + 1),
                text_urdu: format!("urdu {number}:{}", idx + 1),
                text_english: format!("english {number}:{}", idx + 1),
                juz,
                manzil: 1,
                page: 1,
                ruku,
                hizb_quarter: 1,
                audio_url: audio_for(global),
            }
        })
        .collect();
    Surah {
        id: number,
        surah_number: number,
        meta: SurahMeta {
            surah_name_ar: format!("سورة {number}"),
            surah_name_en: format!("Surah {number}"),
            surah_meaning: format!("Meaning {number}"),
            revelation_type: String::new(),
            ayah_count: ayahs.len(),
            audio_bismillah: if number == 1 {
                String::new()
            } else {
                INTRO_URL.to_string()
            },
        },
        ayahs,
    }
}

/// Three chapters. Juz 1 spans #1 and the start of #2, juz 2 covers the rest.
/// Ruku tags run 1..=5.
pub fn sample_surahs() -> Vec<Surah> {
    vec![
        chapter(1, 1, &[(1, 1), (1, 1), (1, 1)]),
        chapter(2, 4, &[(1, 2), (1, 2), (1, 3), (2, 3), (2, 4)]),
        chapter(3, 9, &[(2, 4), (2, 5)]),
    ]
}

pub fn sample_index() -> ContentIndex {
    ContentIndex::from_surahs(sample_surahs())
}

/// Chapter #2 with `count` verses, all in juz 1, used for long sequences.
pub fn long_chapter_index(count: usize) -> ContentIndex {
    let tags = vec![(1u8, 2u16); count];
    ContentIndex::from_surahs(vec![chapter(1, 1, &[(1, 1)]), chapter(2, 2, &tags)])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCommand {
    Load(String),
    Pause,
    Resume,
}

#[derive(Debug, Default)]
struct SinkLog {
    commands: Vec<SinkCommand>,
    events: VecDeque<SinkEvent>,
}

/// Cloneable handle: one copy goes into the controller, the test keeps the
/// other to inspect commands and inject events.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl RecordingSink {
    pub fn commands(&self) -> Vec<SinkCommand> {
        self.log.borrow().commands.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.log
            .borrow()
            .commands
            .iter()
            .filter_map(|command| match command {
                SinkCommand::Load(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn push_event(&self, event: SinkEvent) {
        self.log.borrow_mut().events.push_back(event);
    }

    pub fn clear(&self) {
        self.log.borrow_mut().commands.clear();
    }
}

impl AudioSink for RecordingSink {
    fn load_and_play(&mut self, url: &str) {
        self.log
            .borrow_mut()
            .commands
            .push(SinkCommand::Load(url.to_string()));
    }

    fn pause(&mut self) {
        self.log.borrow_mut().commands.push(SinkCommand::Pause);
    }

    fn resume(&mut self) {
        self.log.borrow_mut().commands.push(SinkCommand::Resume);
    }

    fn poll_event(&mut self) -> Option<SinkEvent> {
        self.log.borrow_mut().events.pop_front()
    }
}
