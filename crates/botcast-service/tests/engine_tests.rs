//! End-to-end engine tests over in-memory repositories
//!
//! These tests drive the services through the same trait ports the
//! PostgreSQL layer implements, with in-memory fakes standing in for
//! the store and the transport. They cover the engine's observable
//! properties: lifecycle rules, counter behavior under concurrency,
//! rate computation, tie-breaking, and winner exclusivity.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use botcast_common::DispatchConfig;
use botcast_core::entities::{Broadcast, BroadcastStatus, Button, ClickEvent, Segment, Variant};
use botcast_core::events::{DeliveryEvent, DeliveryEventKind};
use botcast_core::traits::{
    BroadcastRepository, ButtonClickCount, ButtonRepository, ClickEventRepository, CounterField,
    DeliveryReceipt, MessageTransport, RenderedMessage, RepoResult, SegmentRepository,
    TransportError, VariantRepository,
};
use botcast_core::template::TemplateVars;
use botcast_core::{DomainError, Snowflake, SnowflakeGenerator};
use botcast_service::services::{
    AnalyticsService, CampaignService, DispatchService, IngestService, SegmentResolver,
    ServiceContextBuilder, ServiceError, WinnerService,
};
use botcast_service::{
    CreateBroadcastRequest, CreateButtonRequest, CreateVariantRequest, ServiceContext,
};

// ============================================================================
// In-memory store
// ============================================================================

#[derive(Default)]
struct MemoryStore {
    broadcasts: Mutex<HashMap<i64, Broadcast>>,
    variants: Mutex<HashMap<i64, Variant>>,
    buttons: Mutex<HashMap<i64, Button>>,
    clicks: Mutex<Vec<ClickEvent>>,
    segments: Mutex<HashMap<i64, Segment>>,
    members: Mutex<HashMap<i64, Vec<Snowflake>>>,
    recipients: Mutex<Vec<Snowflake>>,
}

fn bump(counters: &mut botcast_core::entities::DeliveryCounters, field: CounterField) {
    match field {
        CounterField::Sent => counters.sent += 1,
        CounterField::Delivered => counters.delivered += 1,
        CounterField::Opened => counters.opened += 1,
        CounterField::Clicked => counters.clicked += 1,
    }
}

#[async_trait]
impl BroadcastRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Broadcast>> {
        Ok(self.broadcasts.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn list_recent(&self, limit: i64) -> RepoResult<Vec<Broadcast>> {
        let mut all: Vec<_> = self.broadcasts.lock().unwrap().values().cloned().collect();
        all.sort_by(|a, b| b.id.cmp(&a.id));
        all.truncate(limit as usize);
        Ok(all)
    }

    async fn create(&self, broadcast: &Broadcast) -> RepoResult<()> {
        self.broadcasts
            .lock()
            .unwrap()
            .insert(broadcast.id.into_inner(), broadcast.clone());
        Ok(())
    }

    async fn update_status(
        &self,
        id: Snowflake,
        from: BroadcastStatus,
        to: BroadcastStatus,
    ) -> RepoResult<bool> {
        let mut broadcasts = self.broadcasts.lock().unwrap();
        match broadcasts.get_mut(&id.into_inner()) {
            Some(b) if b.status == from => {
                b.status = to;
                b.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete_pending(&self, id: Snowflake) -> RepoResult<bool> {
        let mut broadcasts = self.broadcasts.lock().unwrap();
        let is_pending = broadcasts
            .get(&id.into_inner())
            .is_some_and(|b| b.status == BroadcastStatus::Pending);
        if is_pending {
            broadcasts.remove(&id.into_inner());
        }
        Ok(is_pending)
    }

    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()> {
        let mut broadcasts = self.broadcasts.lock().unwrap();
        if let Some(b) = broadcasts.get_mut(&id.into_inner()) {
            bump(&mut b.counters, field);
        }
        Ok(())
    }

    async fn commit_winner(
        &self,
        broadcast_id: Snowflake,
        variant_id: Snowflake,
    ) -> RepoResult<()> {
        // Both maps mutate under locks held together, mirroring the SQL
        // transaction boundary
        let mut variants = self.variants.lock().unwrap();
        let mut broadcasts = self.broadcasts.lock().unwrap();
        for variant in variants.values_mut() {
            if variant.broadcast_id == broadcast_id {
                variant.is_winner = variant.id == variant_id;
            }
        }
        if let Some(b) = broadcasts.get_mut(&broadcast_id.into_inner()) {
            b.winning_variant_id = Some(variant_id);
        }
        Ok(())
    }
}

#[async_trait]
impl VariantRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Variant>> {
        Ok(self.variants.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Variant>> {
        let mut found: Vec<_> = self
            .variants
            .lock()
            .unwrap()
            .values()
            .filter(|v| v.broadcast_id == broadcast_id)
            .cloned()
            .collect();
        found.sort_by_key(|v| v.id);
        Ok(found)
    }

    async fn name_exists(&self, broadcast_id: Snowflake, name: &str) -> RepoResult<bool> {
        Ok(self
            .variants
            .lock()
            .unwrap()
            .values()
            .any(|v| v.broadcast_id == broadcast_id && v.name == name))
    }

    async fn create(&self, variant: &Variant) -> RepoResult<()> {
        let mut variants = self.variants.lock().unwrap();
        if variants
            .values()
            .any(|v| v.broadcast_id == variant.broadcast_id && v.name == variant.name)
        {
            return Err(DomainError::DuplicateVariantName(variant.name.clone()));
        }
        variants.insert(variant.id.into_inner(), variant.clone());
        Ok(())
    }

    async fn increment_counter(&self, id: Snowflake, field: CounterField) -> RepoResult<()> {
        let mut variants = self.variants.lock().unwrap();
        if let Some(v) = variants.get_mut(&id.into_inner()) {
            bump(&mut v.counters, field);
        }
        Ok(())
    }
}

#[async_trait]
impl ButtonRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Button>> {
        Ok(self.buttons.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn find_by_broadcast(&self, broadcast_id: Snowflake) -> RepoResult<Vec<Button>> {
        let mut found: Vec<_> = self
            .buttons
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.broadcast_id == broadcast_id)
            .cloned()
            .collect();
        found.sort_by_key(|b| (b.row, b.position));
        Ok(found)
    }

    async fn find_by_variant(&self, variant_id: Snowflake) -> RepoResult<Vec<Button>> {
        let mut found: Vec<_> = self
            .buttons
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.variant_id == Some(variant_id))
            .cloned()
            .collect();
        found.sort_by_key(|b| (b.row, b.position));
        Ok(found)
    }

    async fn create(&self, button: &Button) -> RepoResult<()> {
        self.buttons
            .lock()
            .unwrap()
            .insert(button.id.into_inner(), button.clone());
        Ok(())
    }
}

#[async_trait]
impl ClickEventRepository for MemoryStore {
    async fn append(&self, event: &ClickEvent) -> RepoResult<()> {
        self.clicks.lock().unwrap().push(event.clone());
        Ok(())
    }

    async fn count_by_button(&self, broadcast_id: Snowflake) -> RepoResult<Vec<ButtonClickCount>> {
        let clicks = self.clicks.lock().unwrap();
        let mut totals: HashMap<Snowflake, (String, i64)> = HashMap::new();
        for click in clicks.iter().filter(|c| c.broadcast_id == broadcast_id) {
            let entry = totals
                .entry(click.button_id)
                .or_insert_with(|| (click.button_label.clone(), 0));
            entry.1 += 1;
        }
        let mut counts: Vec<_> = totals
            .into_iter()
            .map(|(button_id, (label, clicks))| ButtonClickCount {
                button_id,
                label,
                clicks,
            })
            .collect();
        counts.sort_by(|a, b| b.clicks.cmp(&a.clicks).then(a.button_id.cmp(&b.button_id)));
        Ok(counts)
    }
}

#[async_trait]
impl SegmentRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Segment>> {
        Ok(self.segments.lock().unwrap().get(&id.into_inner()).cloned())
    }

    async fn member_ids(&self, segment_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .get(&segment_id.into_inner())
            .cloned()
            .unwrap_or_default())
    }

    async fn all_recipient_ids(&self) -> RepoResult<Vec<Snowflake>> {
        Ok(self.recipients.lock().unwrap().clone())
    }
}

// ============================================================================
// Fake transport
// ============================================================================

#[derive(Default)]
struct FakeTransport {
    sent: Mutex<Vec<(Snowflake, String)>>,
    fail_recipients: Mutex<HashSet<i64>>,
}

impl FakeTransport {
    fn sent_messages(&self) -> Vec<(Snowflake, String)> {
        self.sent.lock().unwrap().clone()
    }

    fn fail_for(&self, recipient_id: Snowflake) {
        self.fail_recipients
            .lock()
            .unwrap()
            .insert(recipient_id.into_inner());
    }
}

#[async_trait]
impl MessageTransport for FakeTransport {
    async fn dispatch(
        &self,
        message: &RenderedMessage,
        recipient_id: Snowflake,
    ) -> Result<DeliveryReceipt, TransportError> {
        if self
            .fail_recipients
            .lock()
            .unwrap()
            .contains(&recipient_id.into_inner())
        {
            return Err(TransportError::Rejected("blocked by recipient".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((recipient_id, message.text.clone()));
        Ok(DeliveryReceipt::now(recipient_id))
    }
}

// ============================================================================
// Harness
// ============================================================================

struct Engine {
    store: Arc<MemoryStore>,
    transport: Arc<FakeTransport>,
    ctx: ServiceContext,
}

fn engine() -> Engine {
    engine_with(DispatchConfig::default())
}

fn engine_with(config: DispatchConfig) -> Engine {
    let store = Arc::new(MemoryStore::default());
    let transport = Arc::new(FakeTransport::default());
    let ctx = ServiceContextBuilder::new()
        .broadcast_repo(store.clone())
        .variant_repo(store.clone())
        .button_repo(store.clone())
        .click_repo(store.clone())
        .segment_repo(store.clone())
        .transport(transport.clone())
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
        .dispatch_config(config)
        .build()
        .unwrap();
    Engine {
        store,
        transport,
        ctx,
    }
}

impl Engine {
    fn seed_recipients(&self, n: usize) -> Vec<Snowflake> {
        let ids: Vec<Snowflake> = (1..=n as i64).map(|i| Snowflake::new(100_000 + i)).collect();
        *self.store.recipients.lock().unwrap() = ids.clone();
        ids
    }

    fn seed_segment(&self, id: i64, members: &[Snowflake]) -> Snowflake {
        let segment_id = Snowflake::new(id);
        self.store.segments.lock().unwrap().insert(
            id,
            Segment {
                id: segment_id,
                name: format!("segment-{id}"),
                member_count: members.len() as i64,
                created_at: Utc::now(),
            },
        );
        self.store
            .members
            .lock()
            .unwrap()
            .insert(id, members.to_vec());
        segment_id
    }

    async fn create_broadcast(&self, message: &str) -> Snowflake {
        let response = CampaignService::new(&self.ctx)
            .create_broadcast(CreateBroadcastRequest {
                author_id: "1".to_string(),
                message: message.to_string(),
                segment_id: None,
                media: None,
            })
            .await
            .unwrap();
        response.id.parse().unwrap()
    }

    async fn create_variant(&self, broadcast_id: Snowflake, name: &str, message: &str) -> Snowflake {
        let response = CampaignService::new(&self.ctx)
            .create_variant(
                broadcast_id,
                CreateVariantRequest {
                    name: name.to_string(),
                    message: message.to_string(),
                    media: None,
                },
            )
            .await
            .unwrap();
        response.id.parse().unwrap()
    }

    async fn add_callback_button(
        &self,
        broadcast_id: Snowflake,
        variant_id: Option<Snowflake>,
        label: &str,
    ) -> Snowflake {
        let response = CampaignService::new(&self.ctx)
            .add_button(
                broadcast_id,
                CreateButtonRequest {
                    variant_id: variant_id.map(|v| v.to_string()),
                    label: label.to_string(),
                    url: None,
                    callback: Some(format!("cb:{label}")),
                    row: 0,
                    position: 0,
                },
            )
            .await
            .unwrap();
        response.id.parse().unwrap()
    }

    async fn dispatch(&self, broadcast_id: Snowflake) {
        DispatchService::new(&self.ctx)
            .dispatch(broadcast_id, TemplateVars::new())
            .await
            .unwrap();
    }

    async fn ingest(&self, event: DeliveryEvent) -> Result<(), ServiceError> {
        IngestService::new(&self.ctx).record(event).await
    }

    fn event(
        &self,
        broadcast_id: Snowflake,
        variant_id: Option<Snowflake>,
        kind: DeliveryEventKind,
        button_id: Option<Snowflake>,
    ) -> DeliveryEvent {
        DeliveryEvent {
            broadcast_id,
            variant_id,
            recipient_id: Snowflake::new(555),
            kind,
            button_id,
            event_id: None,
        }
    }
}

// ============================================================================
// Campaign authoring and lifecycle
// ============================================================================

#[tokio::test]
async fn create_broadcast_rejects_empty_and_overlong_messages() {
    let engine = engine();
    let service = CampaignService::new(&engine.ctx);

    let err = service
        .create_broadcast(CreateBroadcastRequest {
            author_id: "1".to_string(),
            message: "   ".to_string(),
            segment_id: None,
            media: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = service
        .create_broadcast(CreateBroadcastRequest {
            author_id: "1".to_string(),
            message: "x".repeat(4097),
            segment_id: None,
            media: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "MESSAGE_TOO_LONG");
}

#[tokio::test]
async fn create_broadcast_rejects_unknown_segment() {
    let engine = engine();
    let err = CampaignService::new(&engine.ctx)
        .create_broadcast(CreateBroadcastRequest {
            author_id: "1".to_string(),
            message: "hello".to_string(),
            segment_id: Some("424242".to_string()),
            media: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn duplicate_variant_name_conflicts() {
    let engine = engine();
    let broadcast_id = engine.create_broadcast("base").await;

    engine.create_variant(broadcast_id, "A", "first").await;

    let err = CampaignService::new(&engine.ctx)
        .create_variant(
            broadcast_id,
            CreateVariantRequest {
                name: "A".to_string(),
                message: "second".to_string(),
                media: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "DUPLICATE_VARIANT_NAME");
}

#[tokio::test]
async fn cancel_discards_pending_broadcast_only() {
    let engine = engine();
    engine.seed_recipients(2);
    let service = CampaignService::new(&engine.ctx);

    // Pending: cancel removes it
    let pending_id = engine.create_broadcast("soon gone").await;
    service.cancel_broadcast(pending_id).await.unwrap();
    let err = service.get_broadcast(pending_id).await.unwrap_err();
    assert_eq!(err.status_code(), 404);

    // Dispatched: cancel refuses, recipients were already notified
    let sent_id = engine.create_broadcast("already out").await;
    engine.dispatch(sent_id).await;
    let err = service.cancel_broadcast(sent_id).await.unwrap_err();
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn buttons_are_frozen_after_dispatch() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("with buttons").await;
    engine
        .add_callback_button(broadcast_id, None, "Before")
        .await;
    engine.dispatch(broadcast_id).await;

    let err = CampaignService::new(&engine.ctx)
        .add_button(
            broadcast_id,
            CreateButtonRequest {
                variant_id: None,
                label: "After".to_string(),
                url: None,
                callback: Some("cb:late".to_string()),
                row: 0,
                position: 1,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "BROADCAST_LOCKED");
}

#[tokio::test]
async fn variants_are_frozen_after_dispatch() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("frozen").await;
    engine.dispatch(broadcast_id).await;

    let err = CampaignService::new(&engine.ctx)
        .create_variant(
            broadcast_id,
            CreateVariantRequest {
                name: "late".to_string(),
                message: "too late".to_string(),
                media: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "BROADCAST_LOCKED");
}

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn dispatch_moves_pending_to_sent_and_counts_sends() {
    let engine = engine();
    engine.seed_recipients(5);
    let broadcast_id = engine.create_broadcast("hello everyone").await;

    let report = DispatchService::new(&engine.ctx)
        .dispatch(broadcast_id, TemplateVars::new())
        .await
        .unwrap();

    assert_eq!(report.attempted, 5);
    assert_eq!(report.accepted, 5);
    assert_eq!(report.failed, 0);
    assert_eq!(report.status, "sent");

    let broadcast = CampaignService::new(&engine.ctx)
        .get_broadcast(broadcast_id)
        .await
        .unwrap();
    assert_eq!(broadcast.status, "sent");
    assert_eq!(broadcast.sent, 5);
    assert_eq!(engine.transport.sent_messages().len(), 5);
}

#[tokio::test]
async fn dispatch_is_not_repeatable() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("once only").await;
    engine.dispatch(broadcast_id).await;

    // Terminal state: no transition back into sending
    let err = DispatchService::new(&engine.ctx)
        .dispatch(broadcast_id, TemplateVars::new())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert_eq!(err.error_code(), "INVALID_TRANSITION");
}

#[tokio::test]
async fn dispatch_with_all_recipients_failing_marks_failed() {
    let engine = engine();
    let recipients = engine.seed_recipients(3);
    for id in &recipients {
        engine.transport.fail_for(*id);
    }
    let broadcast_id = engine.create_broadcast("doomed").await;

    let report = DispatchService::new(&engine.ctx)
        .dispatch(broadcast_id, TemplateVars::new())
        .await
        .unwrap();
    assert_eq!(report.accepted, 0);
    assert_eq!(report.failed, 3);
    assert_eq!(report.status, "failed");
}

#[tokio::test]
async fn dispatch_partial_failures_do_not_fail_campaign() {
    let engine = engine();
    let recipients = engine.seed_recipients(4);
    engine.transport.fail_for(recipients[0]);
    let broadcast_id = engine.create_broadcast("mostly fine").await;

    let report = DispatchService::new(&engine.ctx)
        .dispatch(broadcast_id, TemplateVars::new())
        .await
        .unwrap();
    assert_eq!(report.accepted, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.status, "sent");
}

#[tokio::test]
async fn dispatch_round_robins_recipients_over_variants() {
    let engine = engine();
    engine.seed_recipients(6);
    let broadcast_id = engine.create_broadcast("base").await;
    let a = engine.create_variant(broadcast_id, "A", "variant A text").await;
    let b = engine.create_variant(broadcast_id, "B", "variant B text").await;
    engine.dispatch(broadcast_id).await;

    let store = &engine.store;
    let variants = store.variants.lock().unwrap();
    assert_eq!(variants[&a.into_inner()].counters.sent, 3);
    assert_eq!(variants[&b.into_inner()].counters.sent, 3);
}

#[tokio::test]
async fn dispatch_renders_per_recipient_variables() {
    let engine = engine();
    let recipients = engine.seed_recipients(2);
    let broadcast_id = engine.create_broadcast("Hi {recipient_id}").await;
    engine.dispatch(broadcast_id).await;

    let texts: HashSet<String> = engine
        .transport
        .sent_messages()
        .into_iter()
        .map(|(_, text)| text)
        .collect();
    assert_eq!(texts.len(), 2);
    for id in recipients {
        assert!(texts.contains(&format!("Hi {id}")));
    }
}

#[tokio::test]
async fn dispatch_leaves_missing_variables_verbatim() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("Hi {name}, code {code}").await;

    let mut vars = TemplateVars::new();
    vars.insert("name".to_string(), "A".to_string());
    DispatchService::new(&engine.ctx)
        .dispatch(broadcast_id, vars)
        .await
        .unwrap();

    let sent = engine.transport.sent_messages();
    assert_eq!(sent[0].1, "Hi A, code {code}");
}

// ============================================================================
// Segment resolution
// ============================================================================

#[tokio::test]
async fn no_segment_resolves_to_all_recipients() {
    let engine = engine();
    engine.seed_recipients(7);
    let resolution = SegmentResolver::new(&engine.ctx).resolve(None).await.unwrap();
    assert_eq!(resolution.count, 7);
}

#[tokio::test]
async fn segment_resolves_to_current_membership() {
    let engine = engine();
    let all = engine.seed_recipients(5);
    let segment_id = engine.seed_segment(900, &all[..2]);

    let resolution = SegmentResolver::new(&engine.ctx)
        .resolve(Some(segment_id))
        .await
        .unwrap();
    assert_eq!(resolution.count, 2);
}

#[tokio::test]
async fn missing_segment_aborts_unless_fallback_configured() {
    let engine = engine();
    engine.seed_recipients(5);
    let err = SegmentResolver::new(&engine.ctx)
        .resolve(Some(Snowflake::new(31337)))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
    assert_eq!(err.error_code(), "UNKNOWN_SEGMENT");

    let fallback_engine = engine_with(DispatchConfig {
        fallback_to_all_recipients: true,
        worker_id: 0,
    });
    fallback_engine.seed_recipients(5);
    let resolution = SegmentResolver::new(&fallback_engine.ctx)
        .resolve(Some(Snowflake::new(31337)))
        .await
        .unwrap();
    assert_eq!(resolution.count, 5);
}

// ============================================================================
// Event ingestion
// ============================================================================

#[tokio::test]
async fn ingest_routes_events_to_broadcast_counters() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("single").await;
    let button_id = engine.add_callback_button(broadcast_id, None, "Go").await;
    engine.dispatch(broadcast_id).await;

    for _ in 0..3 {
        engine
            .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Delivered, None))
            .await
            .unwrap();
    }
    engine
        .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Opened, None))
        .await
        .unwrap();
    engine
        .ingest(engine.event(
            broadcast_id,
            None,
            DeliveryEventKind::Clicked,
            Some(button_id),
        ))
        .await
        .unwrap();

    let broadcast = CampaignService::new(&engine.ctx)
        .get_broadcast(broadcast_id)
        .await
        .unwrap();
    assert_eq!(broadcast.delivered, 3);
    assert_eq!(broadcast.opened, 1);
    assert_eq!(broadcast.clicked, 1);
}

#[tokio::test]
async fn ingest_rejects_events_before_dispatch() {
    let engine = engine();
    let broadcast_id = engine.create_broadcast("not yet").await;

    let err = engine
        .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Delivered, None))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.error_code(), "INVALID_EVENT");
}

#[tokio::test]
async fn ingest_click_requires_button() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("no button").await;
    engine.dispatch(broadcast_id).await;

    let err = engine
        .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Clicked, None))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_EVENT");

    let err = engine
        .ingest(engine.event(
            broadcast_id,
            None,
            DeliveryEventKind::Clicked,
            Some(Snowflake::new(404)),
        ))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn ingest_click_snapshots_button_label() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("snap").await;
    let button_id = engine.add_callback_button(broadcast_id, None, "Buy now").await;
    engine.dispatch(broadcast_id).await;

    engine
        .ingest(engine.event(
            broadcast_id,
            None,
            DeliveryEventKind::Clicked,
            Some(button_id),
        ))
        .await
        .unwrap();

    let clicks = engine.store.clicks.lock().unwrap();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].button_label, "Buy now");
    assert_eq!(clicks[0].button_id, button_id);
}

#[tokio::test]
async fn ingest_does_not_infer_opened_from_clicked() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("independent").await;
    let button_id = engine.add_callback_button(broadcast_id, None, "Go").await;
    engine.dispatch(broadcast_id).await;

    engine
        .ingest(engine.event(
            broadcast_id,
            None,
            DeliveryEventKind::Clicked,
            Some(button_id),
        ))
        .await
        .unwrap();

    let broadcast = CampaignService::new(&engine.ctx)
        .get_broadcast(broadcast_id)
        .await
        .unwrap();
    assert_eq!(broadcast.clicked, 1);
    assert_eq!(broadcast.opened, 0);
}

#[tokio::test]
async fn ingest_rejects_variant_from_other_broadcast() {
    let engine = engine();
    engine.seed_recipients(1);
    let first = engine.create_broadcast("first").await;
    let second = engine.create_broadcast("second").await;
    let foreign_variant = engine.create_variant(second, "X", "text").await;
    engine.dispatch(first).await;

    let err = engine
        .ingest(engine.event(
            first,
            Some(foreign_variant),
            DeliveryEventKind::Delivered,
            None,
        ))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "INVALID_EVENT");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_click_ingestion_loses_no_updates() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("stress").await;
    let variant_id = engine.create_variant(broadcast_id, "A", "text").await;
    let button_id = engine
        .add_callback_button(broadcast_id, Some(variant_id), "Hot")
        .await;
    engine.dispatch(broadcast_id).await;

    // 10 workers x 10 clicks each, arriving concurrently
    let ctx = Arc::new(engine.ctx.clone());
    let mut handles = Vec::new();
    for worker in 0..10 {
        let ctx = Arc::clone(&ctx);
        handles.push(tokio::spawn(async move {
            for i in 0..10 {
                let event = DeliveryEvent {
                    broadcast_id,
                    variant_id: Some(variant_id),
                    recipient_id: Snowflake::new(700 + worker * 10 + i),
                    kind: DeliveryEventKind::Clicked,
                    button_id: Some(button_id),
                    event_id: None,
                };
                IngestService::new(&ctx).record(event).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let variants = engine.store.variants.lock().unwrap();
    assert_eq!(variants[&variant_id.into_inner()].counters.clicked, 100);
    drop(variants);
    assert_eq!(engine.store.clicks.lock().unwrap().len(), 100);
}

// ============================================================================
// Analytics
// ============================================================================

#[tokio::test]
async fn rates_are_zero_with_no_deliveries() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("quiet").await;
    engine.create_variant(broadcast_id, "A", "text").await;
    engine.dispatch(broadcast_id).await;

    let stats = AnalyticsService::new(&engine.ctx)
        .broadcast_stats(broadcast_id)
        .await
        .unwrap();
    assert_eq!(stats.variants[0].open_rate, 0.0);
    assert_eq!(stats.variants[0].click_rate, 0.0);
    assert_eq!(stats.totals.click_rate, 0.0);
}

#[tokio::test]
async fn broadcast_stats_aggregate_buttons_with_snapshot_labels() {
    let engine = engine();
    engine.seed_recipients(1);
    let broadcast_id = engine.create_broadcast("buttons").await;
    let hot = engine.add_callback_button(broadcast_id, None, "Hot").await;
    let cold = engine.add_callback_button(broadcast_id, None, "Cold").await;
    engine.dispatch(broadcast_id).await;

    for _ in 0..3 {
        engine
            .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Clicked, Some(hot)))
            .await
            .unwrap();
    }
    engine
        .ingest(engine.event(broadcast_id, None, DeliveryEventKind::Clicked, Some(cold)))
        .await
        .unwrap();

    let stats = AnalyticsService::new(&engine.ctx)
        .broadcast_stats(broadcast_id)
        .await
        .unwrap();
    assert_eq!(stats.buttons.len(), 2);
    assert_eq!(stats.buttons[0].label, "Hot");
    assert_eq!(stats.buttons[0].clicks, 3);
    assert_eq!(stats.buttons[1].label, "Cold");
    assert_eq!(stats.buttons[1].clicks, 1);
}

// ============================================================================
// Winner selection
// ============================================================================

/// Drive a broadcast with two variants to `sent` and feed in the given
/// delivered/clicked counts per variant.
async fn ab_campaign(
    engine: &Engine,
    a_counts: (u32, u32),
    b_counts: (u32, u32),
) -> (Snowflake, Snowflake, Snowflake) {
    engine.seed_recipients(2);
    let broadcast_id = engine.create_broadcast("base").await;
    let a = engine.create_variant(broadcast_id, "A", "variant A").await;
    let b = engine.create_variant(broadcast_id, "B", "variant B").await;
    let a_button = engine
        .add_callback_button(broadcast_id, Some(a), "A-btn")
        .await;
    let b_button = engine
        .add_callback_button(broadcast_id, Some(b), "B-btn")
        .await;
    engine.dispatch(broadcast_id).await;

    for (variant, button, (delivered, clicked)) in
        [(a, a_button, a_counts), (b, b_button, b_counts)]
    {
        for _ in 0..delivered {
            engine
                .ingest(engine.event(
                    broadcast_id,
                    Some(variant),
                    DeliveryEventKind::Delivered,
                    None,
                ))
                .await
                .unwrap();
        }
        for _ in 0..clicked {
            engine
                .ingest(engine.event(
                    broadcast_id,
                    Some(variant),
                    DeliveryEventKind::Clicked,
                    Some(button),
                ))
                .await
                .unwrap();
        }
    }
    (broadcast_id, a, b)
}

#[tokio::test]
async fn winner_is_highest_click_rate_end_to_end() {
    let engine = engine();
    // A: 100 delivered / 10 clicked = 10%; B: 50 / 8 = 16%
    let (broadcast_id, _a, b) = ab_campaign(&engine, (100, 10), (50, 8)).await;

    let stats = AnalyticsService::new(&engine.ctx)
        .broadcast_stats(broadcast_id)
        .await
        .unwrap();
    assert_eq!(stats.variants[0].click_rate, 10.0);
    assert_eq!(stats.variants[1].click_rate, 16.0);

    let winner = WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap();
    assert_eq!(winner.winning_variant_id, b.to_string());
    assert_eq!(winner.name, "B");
    assert_eq!(winner.click_rate, 16.0);
}

#[tokio::test]
async fn winner_selection_leaves_exactly_one_winner() {
    let engine = engine();
    let (broadcast_id, _a, b) = ab_campaign(&engine, (100, 10), (50, 8)).await;

    WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap();

    let variants = engine.store.variants.lock().unwrap();
    let winners: Vec<_> = variants
        .values()
        .filter(|v| v.broadcast_id == broadcast_id && v.is_winner)
        .collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].id, b);
    drop(variants);

    let broadcast = engine.store.broadcasts.lock().unwrap();
    assert_eq!(
        broadcast[&broadcast_id.into_inner()].winning_variant_id,
        Some(b)
    );
}

#[tokio::test]
async fn winner_tie_goes_to_earlier_variant() {
    let engine = engine();
    // Identical 10% click rate on both
    let (broadcast_id, a, _b) = ab_campaign(&engine, (100, 10), (100, 10)).await;

    let winner = WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap();
    assert_eq!(winner.winning_variant_id, a.to_string());
}

#[tokio::test]
async fn winner_selection_is_idempotent() {
    let engine = engine();
    let (broadcast_id, _a, b) = ab_campaign(&engine, (100, 10), (50, 8)).await;

    let first = WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap();
    let second = WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap();
    assert_eq!(first.winning_variant_id, second.winning_variant_id);
    assert_eq!(second.winning_variant_id, b.to_string());

    let variants = engine.store.variants.lock().unwrap();
    let winners = variants
        .values()
        .filter(|v| v.broadcast_id == broadcast_id && v.is_winner)
        .count();
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn winner_rerun_follows_changed_rates() {
    let engine = engine();
    let (broadcast_id, a, b) = ab_campaign(&engine, (100, 10), (50, 8)).await;
    let winner_service = WinnerService::new(&engine.ctx);

    let first = winner_service.select_winner(broadcast_id).await.unwrap();
    assert_eq!(first.winning_variant_id, b.to_string());

    // Late click reports push A past B: 100 delivered / 20 clicked = 20%
    let buttons = engine.store.buttons.lock().unwrap();
    let a_button = buttons
        .values()
        .find(|btn| btn.variant_id == Some(a))
        .unwrap()
        .id;
    drop(buttons);
    for _ in 0..10 {
        engine
            .ingest(engine.event(
                broadcast_id,
                Some(a),
                DeliveryEventKind::Clicked,
                Some(a_button),
            ))
            .await
            .unwrap();
    }

    let second = winner_service.select_winner(broadcast_id).await.unwrap();
    assert_eq!(second.winning_variant_id, a.to_string());

    let variants = engine.store.variants.lock().unwrap();
    let winners: Vec<_> = variants
        .values()
        .filter(|v| v.broadcast_id == broadcast_id && v.is_winner)
        .collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(winners[0].id, a);
}

#[tokio::test]
async fn winner_needs_at_least_two_variants() {
    let engine = engine();
    engine.seed_recipients(1);

    // Zero variants
    let empty_id = engine.create_broadcast("no variants").await;
    engine.dispatch(empty_id).await;
    let err = WinnerService::new(&engine.ctx)
        .select_winner(empty_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 422);
    assert_eq!(err.error_code(), "NOT_APPLICABLE");

    // One variant: still no A/B test to close
    let single_id = engine.create_broadcast("one variant").await;
    engine.create_variant(single_id, "only", "text").await;
    engine.dispatch(single_id).await;
    let err = WinnerService::new(&engine.ctx)
        .select_winner(single_id)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_APPLICABLE");
}

#[tokio::test]
async fn winner_requires_sent_broadcast() {
    let engine = engine();
    let broadcast_id = engine.create_broadcast("still pending").await;
    engine.create_variant(broadcast_id, "A", "a").await;
    engine.create_variant(broadcast_id, "B", "b").await;

    let err = WinnerService::new(&engine.ctx)
        .select_winner(broadcast_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
}
