use std::io::Cursor;
use std::num::NonZeroUsize;

use anagram_search::{
    extract_words, CollectSentences, EndsWithLetter, LetterPool, NoRepeatedWords, Phrase,
    PhraseList, SearchConfig, SentenceBuilder, UniqueWordLengths,
};
use itertools::Itertools;

fn sentences(builder: &SentenceBuilder, pool: &LetterPool) -> Vec<String> {
    let hooks = CollectSentences::new();
    builder.run(pool, &hooks);
    hooks.into_sentences()
}

fn dormitory() -> (LetterPool, PhraseList) {
    let pool = LetterPool::from_letters("dormitory");
    let source = Cursor::new(
        "dirty room\ndirty\nroom\ndorm\nit\nor\ny\ntory\nmy\nrot\nriot\ndormitory\nmoody\n",
    );
    let phrases = PhraseList::load(source, &pool).unwrap();
    (pool, phrases)
}

#[test]
fn two_phrases_in_both_orders() {
    let pool = LetterPool::from_letters("catdog");
    let phrases = PhraseList::from_phrases(["cat", "dog"], &pool);
    let found = sentences(&SentenceBuilder::new(&phrases), &pool);
    assert_eq!(found, vec!["cat dog", "dog cat"]);
}

#[test]
fn eat_scenario_from_reader() {
    let pool = LetterPool::from_letters("eat");
    let phrases = PhraseList::load(Cursor::new("eat\ntea\nate\nat\neast\n"), &pool).unwrap();
    let found = sentences(&SentenceBuilder::new(&phrases), &pool);
    assert_eq!(found, vec!["eat", "tea", "ate"]);
}

#[test]
fn every_sentence_uses_the_pool_exactly() {
    let (pool, phrases) = dormitory();
    let found = sentences(&SentenceBuilder::new(&phrases), &pool);
    assert!(found.contains(&"dirty room".to_string()));
    assert!(found.contains(&"room dirty".to_string()));
    assert!(found.contains(&"dormitory".to_string()));
    for sentence in &found {
        assert_eq!(LetterPool::from_letters(sentence), pool, "{}", sentence);

        let mut remaining = pool;
        assert!(remaining.spell_all(sentence.split(' ')));
        assert!(remaining.is_empty());
    }
}

#[test]
fn letters_are_conserved_along_every_branch() {
    let (pool, phrases) = dormitory();
    let total = pool.total_count();
    let conserved = move |_: &Phrase, sentence: &str, remaining: &LetterPool| {
        let used = sentence.chars().filter(char::is_ascii_alphabetic).count();
        assert_eq!(used + remaining.total_count(), total);
        true
    };
    let found = sentences(&SentenceBuilder::new(&phrases).rule(conserved), &pool);
    assert!(!found.is_empty());
}

#[test]
fn narrowing_twice_changes_nothing() {
    let (pool, phrases) = dormitory();
    let mut remaining = pool;
    remaining.subtract("dirty");

    let once = phrases.narrow(&remaining);
    assert_eq!(once.narrow(&remaining), once);
    assert!(once.iter().all(|p| remaining.can_spell(p.text())));
    assert!(once.iter().any(|p| p.text() == "room"));
    assert!(once.iter().all(|p| p.text() != "dirty"));
}

#[test]
fn word_budget_is_enforced() {
    let (pool, phrases) = dormitory();
    let unlimited = sentences(&SentenceBuilder::new(&phrases), &pool);
    let limited = sentences(&SentenceBuilder::new(&phrases).max_words(Some(2)), &pool);

    assert!(limited.len() < unlimited.len());
    assert!(limited.iter().all(|s| s.split(' ').count() <= 2));
    assert!(limited.contains(&"dirty room".to_string()));
    let expected = unlimited
        .iter()
        .filter(|s| s.split(' ').count() <= 2)
        .cloned()
        .collect_vec();
    assert_eq!(limited, expected);
}

#[test]
fn parallel_search_finds_the_same_sentences() {
    let (pool, phrases) = dormitory();
    let sequential = sentences(&SentenceBuilder::new(&phrases), &pool);

    for threads in [2, 3, 8] {
        let hooks = CollectSentences::new();
        let config = SearchConfig::default()
            .with_threads(NonZeroUsize::new(threads).unwrap());
        let stats = SentenceBuilder::new(&phrases)
            .run_with_config(&pool, &config, &hooks)
            .unwrap();
        assert_eq!(stats.sentences as usize, sequential.len());
        assert!(!stats.cancelled);

        let parallel = hooks.into_sentences();
        assert_eq!(
            parallel.into_iter().sorted().collect_vec(),
            sequential.iter().cloned().sorted().collect_vec()
        );
    }
}

#[test]
fn result_limit_stops_a_parallel_search() {
    let (pool, phrases) = dormitory();
    let hooks = CollectSentences::with_limit(1);
    SentenceBuilder::new(&phrases)
        .run_parallel(&pool, NonZeroUsize::new(4).unwrap(), &hooks)
        .unwrap();
    assert!(hooks.cancel_flag().is_cancelled());
    assert_eq!(hooks.len(), 1);
}

#[test]
fn final_letter_rule() {
    let pool = LetterPool::from_letters("saw now");
    let phrases = PhraseList::from_phrases(["saw", "now", "won", "was", "own", "sow"], &pool);
    let found = sentences(
        &SentenceBuilder::new(&phrases).rule(EndsWithLetter('w')),
        &pool,
    );
    assert_eq!(found, vec!["saw now", "now saw", "won saw", "was now", "own saw"]);
}

#[test]
fn final_letter_filter_at_load() {
    let pool = LetterPool::from_letters("wander");
    let source = Cursor::new("wand\ndrawn\nraw\nred\nend\n");
    let phrases = PhraseList::load_filtered(source, &pool, &EndsWithLetter('w')).unwrap();
    let texts = phrases.iter().map(Phrase::text).collect_vec();
    assert_eq!(texts, vec!["raw", "red", "end"]);
}

#[test]
fn unique_word_lengths_rule() {
    let pool = LetterPool::from_letters("atat");
    let phrases = PhraseList::from_phrases(["at", "ta", "a", "t"], &pool);
    let two_letter_words = |s: &String| s.split(' ').filter(|w| w.len() == 2).count();

    let unrestricted = sentences(&SentenceBuilder::new(&phrases), &pool);
    assert!(unrestricted.contains(&"at ta".to_string()));

    let found = sentences(
        &SentenceBuilder::new(&phrases).rule(UniqueWordLengths(vec![2])),
        &pool,
    );
    assert!(found.contains(&"at a t".to_string()));
    assert!(found.iter().all(|s| two_letter_words(s) <= 1));
    assert_eq!(
        found.len(),
        unrestricted.iter().filter(|s| two_letter_words(*s) <= 1).count()
    );
}

#[test]
fn repeated_words_rule() {
    let pool = LetterPool::from_letters("thethe");
    let phrases = PhraseList::from_phrases(["the", "eth"], &pool);
    assert_eq!(sentences(&SentenceBuilder::new(&phrases), &pool).len(), 4);

    let found = sentences(&SentenceBuilder::new(&phrases).rule(NoRepeatedWords), &pool);
    assert_eq!(found, vec!["the eth", "eth the"]);
}

#[test]
fn phrases_from_extracted_words() {
    let words = extract_words(Cursor::new("Tea time: eat, ate, tea."))
        .unwrap()
        .sort_and_dedup();
    let pool = LetterPool::from_letters("eat");
    let phrases = PhraseList::from_phrases(words.iter().map(Phrase::text), &pool);
    let found = sentences(&SentenceBuilder::new(&phrases), &pool);
    assert_eq!(found, vec!["ate", "eat", "tea"]);
}
