//! Tests for the sticker browser view-model: edit mode, derived section
//! list, selection steps and store failures.

mod common;

use std::time::Duration;

use common::*;
use photo_stickers::error::StoreError;
use photo_stickers::flow::{FlowCoordinator, Step};
use photo_stickers::config::StickerPickPolicy;
use photo_stickers::ui::sticker_browser::{
    ActionButtonType, StickerBrowserIntent, StickerBrowserOutput, StickerBrowserViewModel,
    StickerSectionItem,
};
use photo_stickers::ui::PresentationStyle;
use tokio::sync::mpsc;

fn last_items(outputs: &[StickerBrowserOutput]) -> Option<Vec<StickerSectionItem>> {
    outputs.iter().rev().find_map(|output| match output {
        StickerBrowserOutput::SectionItems(items) => Some(items.clone()),
        _ => None,
    })
}

fn ids(items: &[StickerSectionItem]) -> Vec<Option<photo_stickers::model::StickerId>> {
    items.iter().map(|item| item.sticker().map(|s| s.id)).collect()
}

fn style_requests(outputs: &[StickerBrowserOutput]) -> Vec<PresentationStyle> {
    outputs
        .iter()
        .filter_map(|output| match output {
            StickerBrowserOutput::RequestPresentationStyle(style) => Some(*style),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn initial_outputs_hide_bar_and_show_edit_button() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();

    let initial = drain(&mut outputs);
    assert!(matches!(
        initial[0],
        StickerBrowserOutput::NavigationBarHidden(true)
    ));
    assert!(matches!(
        initial[1],
        StickerBrowserOutput::ActionButtonType(ActionButtonType::Edit)
    ));
    let items = last_items(&initial).expect("initial list");
    assert_eq!(items.len(), 1);
    assert!(items[0].is_add_sticker());
}

#[tokio::test]
async fn action_button_toggles_editing_each_tap() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    let mut expected = false;
    for _ in 0..5 {
        let shown = vm.state().action_button_type();
        vm.dispatch(StickerBrowserIntent::ActionButtonTapped(shown));
        expected = !expected;
        assert_eq!(vm.state().is_editing, expected);
        assert_eq!(
            vm.state().action_button_type(),
            if expected {
                ActionButtonType::Done
            } else {
                ActionButtonType::Edit
            }
        );
    }

    let buttons: Vec<_> = drain(&mut outputs)
        .into_iter()
        .filter_map(|output| match output {
            StickerBrowserOutput::ActionButtonType(button) => Some(button),
            _ => None,
        })
        .collect();
    assert_eq!(
        buttons,
        vec![
            ActionButtonType::Done,
            ActionButtonType::Edit,
            ActionButtonType::Done,
            ActionButtonType::Edit,
            ActionButtonType::Done,
        ]
    );
}

#[tokio::test]
async fn expanded_is_requested_only_when_entering_edit_mode() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    vm.dispatch(StickerBrowserIntent::ActionButtonTapped(ActionButtonType::Edit));
    assert_eq!(style_requests(&drain(&mut outputs)), vec![PresentationStyle::Expanded]);

    vm.dispatch(StickerBrowserIntent::ActionButtonTapped(ActionButtonType::Done));
    assert!(style_requests(&drain(&mut outputs)).is_empty());

    vm.dispatch(StickerBrowserIntent::PresentationStyleChanged(
        PresentationStyle::Expanded,
    ));
    assert!(style_requests(&drain(&mut outputs)).is_empty());
}

#[tokio::test]
async fn navigation_bar_follows_every_style_change() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    for (style, hidden) in [
        (PresentationStyle::Expanded, false),
        (PresentationStyle::Expanded, false),
        (PresentationStyle::Compact, true),
    ] {
        vm.dispatch(StickerBrowserIntent::PresentationStyleChanged(style));
        let bars: Vec<_> = drain(&mut outputs)
            .into_iter()
            .filter_map(|output| match output {
                StickerBrowserOutput::NavigationBarHidden(hidden) => Some(hidden),
                _ => None,
            })
            .collect();
        assert_eq!(bars, vec![hidden]);
    }
}

#[tokio::test]
async fn only_rendered_stickers_are_listed_before_add_entry() {
    let h = harness(CountingRenderer::returning(None));
    let sticker_a = h.store.seed(true).await;
    let _sticker_b = h.store.seed(false).await;

    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();

    let items = last_items(&drain(&mut outputs)).expect("list");
    assert_eq!(ids(&items), vec![Some(sticker_a.id), None]);
}

#[tokio::test]
async fn list_is_rebuilt_on_store_and_editing_changes() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    let first = h.store.seed(true).await;
    let second = h.store.seed(true).await;
    assert!(vm.poll_store());
    assert!(!vm.poll_store());
    let items = last_items(&drain(&mut outputs)).expect("list after store change");
    assert_eq!(ids(&items), vec![Some(first.id), Some(second.id), None]);

    vm.dispatch(StickerBrowserIntent::ActionButtonTapped(ActionButtonType::Edit));
    let items = last_items(&drain(&mut outputs)).expect("list after edit toggle");
    assert_eq!(items.len(), 3);
    for item in &items {
        if let StickerSectionItem::Sticker(cell) = item {
            assert!(cell.shows_delete_badge());
            assert!(cell.thumbnail().is_some());
        }
    }
    assert!(items[2].is_add_sticker());
}

#[tokio::test]
async fn selection_emits_matching_step() {
    let h = harness(CountingRenderer::returning(None));
    let first = h.store.seed(true).await;
    let second = h.store.seed(true).await;

    let mut coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    vm.dispatch(StickerBrowserIntent::ItemSelected(2));
    assert_eq!(coordinator.try_next_step(), Some(Step::AddStickerIsPicked));

    vm.dispatch(StickerBrowserIntent::ItemSelected(1));
    assert_eq!(coordinator.try_next_step(), Some(Step::StickerIsPicked(second)));

    vm.dispatch(StickerBrowserIntent::ItemSelected(0));
    assert_eq!(coordinator.try_next_step(), Some(Step::StickerIsPicked(first)));

    let opened = drain(&mut outputs)
        .into_iter()
        .filter(|output| matches!(output, StickerBrowserOutput::OpenStickerItem(_)))
        .count();
    assert_eq!(opened, 3);
}

#[tokio::test]
async fn add_entry_emits_add_step_with_empty_store() {
    let h = harness(CountingRenderer::returning(None));
    let mut coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, _outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();

    vm.dispatch(StickerBrowserIntent::ItemSelected(0));
    assert_eq!(coordinator.try_next_step(), Some(Step::AddStickerIsPicked));
}

#[tokio::test]
async fn out_of_range_selection_is_ignored() {
    let h = harness(CountingRenderer::returning(None));
    let mut coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    vm.dispatch(StickerBrowserIntent::ItemSelected(7));
    assert_eq!(coordinator.try_next_step(), None);
    assert!(drain(&mut outputs).is_empty());
}

#[tokio::test]
async fn failed_query_degrades_to_add_entry_only() {
    let h = harness(CountingRenderer::returning(None));
    let sticker = h.store.seed(true).await;
    h.store.script_queries(Ok(vec![sticker.clone()]));

    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    assert_eq!(ids(vm.items()), vec![Some(sticker.id), None]);

    h.store
        .send_query(Err(StoreError::Serialize("index corrupted".to_string())));
    assert!(vm.poll_store());
    let items = last_items(&drain(&mut outputs)).expect("degraded list");
    assert_eq!(ids(&items), vec![None]);

    // The stream keeps working after a failure.
    h.store.send_query(Ok(vec![sticker.clone()]));
    assert!(vm.poll_store());
    assert_eq!(ids(vm.items()), vec![Some(sticker.id), None]);
}

#[tokio::test]
async fn run_observes_store_changes() {
    let h = harness(CountingRenderer::returning(None));
    let coordinator = FlowCoordinator::new(StickerPickPolicy::Edit);
    let (mut vm, mut outputs) = StickerBrowserViewModel::new(&h.services, coordinator.relay());
    vm.start();
    drain(&mut outputs);

    let (intents, intent_rx) = mpsc::unbounded_channel();
    let store = h.store.clone();
    let task = tokio::spawn(async move {
        vm.run(intent_rx).await;
        vm
    });

    let sticker = store.seed(true).await;
    let mut seen = None;
    for _ in 0..200 {
        if let Ok(StickerBrowserOutput::SectionItems(items)) = outputs.try_recv() {
            seen = Some(items);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let items = seen.expect("list pushed by run loop");
    assert_eq!(ids(&items), vec![Some(sticker.id), None]);

    drop(intents);
    let vm = task.await.expect("run loop ended");
    assert_eq!(vm.items().len(), 2);
}
