/*!
 * Tests for the mock translator used by tests and dry runs
 */

use srt_translate::errors::TranslationError;
use srt_translate::providers::mock::{MockBehavior, MockTranslator};
use srt_translate::translation::Translator;

#[tokio::test]
async fn test_mock_identity_withText_shouldReturnInput() {
    let translator = MockTranslator::identity();

    let result = translator.translate("Hello", "auto", "fr").await.unwrap();

    assert_eq!(result, "Hello");
    assert_eq!(translator.call_count(), 1);
}

#[tokio::test]
async fn test_mock_prefixed_withText_shouldTagTargetLanguage() {
    let translator = MockTranslator::prefixed();
    assert_eq!(translator.translate("Hello", "en", "de").await.unwrap(), "[de] Hello");
}

#[tokio::test]
async fn test_mock_failOnCall_withSecondCall_shouldFailOnlyThatCall() {
    let translator = MockTranslator::fail_on_call(2);

    assert!(translator.translate("one", "auto", "en").await.is_ok());
    assert!(matches!(
        translator.translate("two", "auto", "en").await,
        Err(TranslationError::Provider(_))
    ));
    assert!(translator.translate("three", "auto", "en").await.is_ok());

    let texts: Vec<String> = translator.requests().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["one", "two", "three"]);
}

#[tokio::test]
async fn test_mock_failing_withAnyText_shouldAlwaysFail() {
    let translator = MockTranslator::new(MockBehavior::Failing);

    for _ in 0..3 {
        assert!(translator.translate("x", "auto", "en").await.is_err());
    }
    assert_eq!(translator.call_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_mock_staggered_withFirstCall_shouldWaitLongest() {
    let translator = MockTranslator::staggered(400);

    let start = tokio::time::Instant::now();
    translator.translate("first", "auto", "en").await.unwrap();
    let first = start.elapsed();

    let start = tokio::time::Instant::now();
    translator.translate("second", "auto", "en").await.unwrap();
    let second = start.elapsed();

    assert!(first > second);
}
