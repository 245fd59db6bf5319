use quiz_core::model::QuestionDraft;
use quiz_core::random::{ScriptedRandom, SeededRandom};
use quiz_core::session::SessionState;
use quiz_core::time::fixed_now;
use services::{AppServices, Clock, PracticeService};
use storage::repository::Storage;

#[tokio::test]
async fn diritto_penale_single_question_scores_full_marks() {
    let clock = Clock::fixed(fixed_now());
    let mut services = AppServices::from_storage(Storage::in_memory(), clock)
        .await
        .with_practice(PracticeService::new(clock).with_random(ScriptedRandom::identity()));

    let set_id = services
        .bank_mut()
        .create_set("diritto penale", None)
        .await
        .expect("create set");
    services
        .bank_mut()
        .add_question(
            set_id,
            QuestionDraft::new(
                "Qual è l'art. 1 c.p.?",
                ["Legalità", "Analogia", "Retroattività"],
                0,
            ),
        )
        .await
        .expect("add question");

    let (bank, practice) = services.split_mut();
    practice.select_sets([set_id]);
    practice.set_requested_count(1).unwrap();
    let view = practice.start(bank.bank()).expect("start");
    assert_eq!(view.prompt, "Qual è l'art. 1 c.p.?");

    let answered = practice.answer(0).expect("answer");
    let feedback = answered.feedback.expect("feedback");
    assert_eq!(feedback.chosen, 0);
    assert!(feedback.is_correct);

    let recorded = practice.session().unwrap().answers()[0];
    assert_eq!((recorded.chosen, recorded.correct), (0, 0));
    assert_eq!(practice.state(), SessionState::Completed);
    assert_eq!(practice.results().unwrap().percent, 100);
}

#[tokio::test]
async fn session_never_draws_more_than_the_pool() {
    let clock = Clock::fixed(fixed_now());
    let mut services = AppServices::from_storage(Storage::in_memory(), clock)
        .await
        .with_practice(PracticeService::new(clock).with_random(SeededRandom::new(42)));

    let set_id = services.bank_mut().create_set("Pool", None).await.unwrap();
    for i in 0..4 {
        services
            .bank_mut()
            .add_question(set_id, QuestionDraft::new(format!("Q{i}"), ["a", "b"], 0))
            .await
            .unwrap();
    }

    let (bank, practice) = services.split_mut();
    assert_eq!(practice.requested_count(), 10);
    let view = practice.start(bank.bank()).unwrap();
    assert_eq!(view.total, 4);

    let mut prompts: Vec<String> = practice
        .session()
        .unwrap()
        .queue()
        .iter()
        .map(|q| q.prompt().to_owned())
        .collect();
    prompts.sort();
    assert_eq!(prompts, vec!["Q0", "Q1", "Q2", "Q3"]);
}
