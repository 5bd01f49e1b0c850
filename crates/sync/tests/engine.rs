//! Reconciliation engine behavior against an in-memory catalog fake.
//!
//! The fake keeps per-locale entity stores behind a shared mutex and counts
//! every record it creates, so the tests can assert the invariants that
//! matter: a second run writes nothing, dependency-ordering failures leave
//! nothing behind, and a batch completes through per-item failures.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use catalog_core::{
    EntityId, EntityKind, Locale, LocalePair, LocalizationRef, Page, ParameterType,
    ParameterTypeRef, ParameterValue, Product, ProductParameter,
};
use catalog_sync::batch::BatchDriver;
use catalog_sync::cache::{CacheKey, LocalizationCache};
use catalog_sync::client::{CatalogClient, LinkOutcome, ProductLocalizationInput};
use catalog_sync::error::{RemoteError, SyncError, TranslationError};
use catalog_sync::reconcile::{Outcome, ReconcileEngine};
use catalog_sync::translate::{TermOverrides, TranslationGateway, TranslationProvider};

#[derive(Default)]
struct State {
    types: Vec<(Locale, ParameterType)>,
    values: Vec<(Locale, ParameterValue)>,
    products: Vec<(Locale, Product)>,
    joins: HashMap<String, Vec<ProductParameter>>,
    peers: HashMap<(EntityKind, String), EntityId>,
    writes: u64,
    next_id: u64,
    fail_products: HashSet<String>,
}

impl State {
    fn fresh_id(&mut self) -> EntityId {
        self.next_id += 1;
        EntityId::new(self.next_id.to_string())
    }
}

#[derive(Clone, Default)]
struct FakeCatalog {
    state: Arc<Mutex<State>>,
}

impl FakeCatalog {
    fn writes(&self) -> u64 {
        self.state.lock().unwrap().writes
    }

    fn seed_type(&self, locale: Locale, name: &str, slug: &str) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_id();
        state.types.push((
            locale,
            ParameterType {
                id: id.clone(),
                name: name.to_string(),
                slug: slug.to_string(),
                localizations: vec![],
            },
        ));
        id
    }

    /// Seed a parameter type with its peer already in place, cross-linked
    /// both ways as the backend stores them.
    fn seed_type_pair(&self, name_uk: &str, name_ru: &str, slug: &str) -> (EntityId, EntityId) {
        let uk = self.seed_type(Locale::Uk, name_uk, slug);
        let ru = self.seed_type(Locale::Ru, name_ru, slug);
        self.link(&uk, Locale::Uk, &ru, Locale::Ru);
        (uk, ru)
    }

    fn seed_value(
        &self,
        locale: Locale,
        value: &str,
        code: &str,
        owner: Option<&EntityId>,
    ) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let parameter_type = owner.map(|owner_id| ParameterTypeRef {
            id: owner_id.clone(),
            name: state
                .types
                .iter()
                .find(|(_, t)| t.id == *owner_id)
                .map(|(_, t)| t.name.clone())
                .unwrap_or_default(),
        });
        let id = state.fresh_id();
        state.values.push((
            locale,
            ParameterValue {
                id: id.clone(),
                value: value.to_string(),
                code: code.to_string(),
                parameter_type,
                localizations: vec![],
            },
        ));
        id
    }

    fn seed_product(&self, locale: Locale, product: Product) -> EntityId {
        let mut state = self.state.lock().unwrap();
        let mut product = product;
        let id = state.fresh_id();
        product.id = id.clone();
        state.products.push((locale, product));
        id
    }

    fn seed_peer(&self, kind: EntityKind, id: &EntityId, peer: &EntityId) {
        let mut state = self.state.lock().unwrap();
        state
            .peers
            .insert((kind, id.as_str().to_string()), peer.clone());
    }

    fn fail_product(&self, part_number: &str) {
        let mut state = self.state.lock().unwrap();
        state.fail_products.insert(part_number.to_string());
    }

    /// Cross-link two already-seeded records as localization peers.
    fn link(&self, a: &EntityId, locale_a: Locale, b: &EntityId, locale_b: Locale) {
        let mut state = self.state.lock().unwrap();
        for (_, t) in &mut state.types {
            if t.id == *a {
                t.localizations.push(LocalizationRef {
                    id: b.clone(),
                    locale: locale_b,
                });
            } else if t.id == *b {
                t.localizations.push(LocalizationRef {
                    id: a.clone(),
                    locale: locale_a,
                });
            }
        }
        for (_, v) in &mut state.values {
            if v.id == *a {
                v.localizations.push(LocalizationRef {
                    id: b.clone(),
                    locale: locale_b,
                });
            } else if v.id == *b {
                v.localizations.push(LocalizationRef {
                    id: a.clone(),
                    locale: locale_a,
                });
            }
        }
        for (_, p) in &mut state.products {
            if p.id == *a {
                p.localizations.push(LocalizationRef {
                    id: b.clone(),
                    locale: locale_b,
                });
            } else if p.id == *b {
                p.localizations.push(LocalizationRef {
                    id: a.clone(),
                    locale: locale_a,
                });
            }
        }
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: u32, page_size: u32) -> Page<T> {
    let total = items.len() as u64;
    let page_count = (u32::try_from(items.len()).unwrap()).div_ceil(page_size).max(1);
    let start = ((page - 1) * page_size) as usize;
    let items = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    Page {
        items,
        page,
        page_count,
        total,
    }
}

impl CatalogClient for FakeCatalog {
    async fn parameter_type_by_name(
        &self,
        name: &str,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .types
            .iter()
            .find(|(l, t)| *l == locale && t.name == name)
            .map(|(_, t)| t.clone()))
    }

    async fn parameter_type_by_id(
        &self,
        id: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterType>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .types
            .iter()
            .find(|(l, t)| *l == locale && t.id == *id)
            .map(|(_, t)| t.clone()))
    }

    async fn create_parameter_type(
        &self,
        name: &str,
        slug: &str,
        locale: Locale,
    ) -> Result<ParameterType, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_id();
        let created = ParameterType {
            id,
            name: name.to_string(),
            slug: slug.to_string(),
            localizations: vec![],
        };
        state.types.push((locale, created.clone()));
        state.writes += 1;
        Ok(created)
    }

    async fn create_parameter_type_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        name: &str,
        slug: &str,
    ) -> Result<LinkOutcome, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let Some((source_locale, source)) = state
            .types
            .iter()
            .find(|(_, t)| t.id == *id)
            .map(|(l, t)| (*l, t.clone()))
        else {
            return Err(RemoteError::MalformedResponse(format!(
                "no parameter type {id}"
            )));
        };
        if let Some(existing) = source.localization(locale) {
            return Ok(LinkOutcome::AlreadyExists(Some(existing.clone())));
        }
        let peer_id = state.fresh_id();
        state.types.push((
            locale,
            ParameterType {
                id: peer_id.clone(),
                name: name.to_string(),
                slug: slug.to_string(),
                localizations: vec![LocalizationRef {
                    id: id.clone(),
                    locale: source_locale,
                }],
            },
        ));
        for (_, t) in &mut state.types {
            if t.id == *id {
                t.localizations.push(LocalizationRef {
                    id: peer_id.clone(),
                    locale,
                });
            }
        }
        state.writes += 1;
        Ok(LinkOutcome::Created(peer_id))
    }

    async fn list_parameter_types(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterType>, RemoteError> {
        let state = self.state.lock().unwrap();
        let items: Vec<_> = state
            .types
            .iter()
            .filter(|(l, _)| *l == locale)
            .map(|(_, t)| t.clone())
            .collect();
        Ok(paginate(items, page, page_size))
    }

    async fn parameter_value_by_value(
        &self,
        value: &str,
        _parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<Option<ParameterValue>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .values
            .iter()
            .find(|(l, v)| *l == locale && v.value == value)
            .map(|(_, v)| v.clone()))
    }

    async fn create_parameter_value(
        &self,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
        locale: Locale,
    ) -> Result<ParameterValue, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let id = state.fresh_id();
        let created = ParameterValue {
            id,
            value: value.to_string(),
            code: code.to_string(),
            parameter_type: Some(ParameterTypeRef {
                id: parameter_type.clone(),
                name: String::new(),
            }),
            localizations: vec![],
        };
        state.values.push((locale, created.clone()));
        state.writes += 1;
        Ok(created)
    }

    async fn create_parameter_value_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        value: &str,
        code: &str,
        parameter_type: &EntityId,
    ) -> Result<LinkOutcome, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let Some((source_locale, source)) = state
            .values
            .iter()
            .find(|(_, v)| v.id == *id)
            .map(|(l, v)| (*l, v.clone()))
        else {
            return Err(RemoteError::MalformedResponse(format!(
                "no parameter value {id}"
            )));
        };
        if let Some(existing) = source.localization(locale) {
            return Ok(LinkOutcome::AlreadyExists(Some(existing.clone())));
        }
        let peer_id = state.fresh_id();
        state.values.push((
            locale,
            ParameterValue {
                id: peer_id.clone(),
                value: value.to_string(),
                code: code.to_string(),
                parameter_type: Some(ParameterTypeRef {
                    id: parameter_type.clone(),
                    name: String::new(),
                }),
                localizations: vec![LocalizationRef {
                    id: id.clone(),
                    locale: source_locale,
                }],
            },
        ));
        for (_, v) in &mut state.values {
            if v.id == *id {
                v.localizations.push(LocalizationRef {
                    id: peer_id.clone(),
                    locale,
                });
            }
        }
        state.writes += 1;
        Ok(LinkOutcome::Created(peer_id))
    }

    async fn list_parameter_values(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<ParameterValue>, RemoteError> {
        let state = self.state.lock().unwrap();
        let items: Vec<_> = state
            .values
            .iter()
            .filter(|(l, _)| *l == locale)
            .map(|(_, v)| v.clone())
            .collect();
        Ok(paginate(items, page, page_size))
    }

    async fn product_by_part_number(
        &self,
        part_number: &str,
        locale: Locale,
    ) -> Result<Option<Product>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .products
            .iter()
            .find(|(l, p)| *l == locale && p.part_number == part_number)
            .map(|(_, p)| p.clone()))
    }

    async fn create_product_localization(
        &self,
        id: &EntityId,
        locale: Locale,
        fields: &ProductLocalizationInput,
    ) -> Result<LinkOutcome, RemoteError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_products.contains(&fields.part_number) {
            return Err(RemoteError::GraphQL {
                messages: vec!["Internal Server Error".to_string()],
            });
        }
        // Locale uniqueness on the part number, as the backend enforces it:
        // an unlinked record in the target locale still rejects the create.
        if let Some((_, existing)) = state
            .products
            .iter()
            .find(|(l, p)| *l == locale && p.part_number == fields.part_number)
        {
            return Ok(LinkOutcome::AlreadyExists(Some(existing.id.clone())));
        }
        let Some(source_locale) = state
            .products
            .iter()
            .find(|(_, p)| p.id == *id)
            .map(|(l, _)| *l)
        else {
            return Err(RemoteError::MalformedResponse(format!("no product {id}")));
        };
        let peer_id = state.fresh_id();
        state.products.push((
            locale,
            Product {
                id: peer_id.clone(),
                part_number: fields.part_number.clone(),
                title: fields.title.clone(),
                description: fields.description.clone(),
                retail: fields.retail,
                currency: fields.currency.clone(),
                slug: Some(fields.slug.clone()),
                image_link: fields.image_link.clone(),
                additional_images: fields.additional_images.clone(),
                media_archive: None,
                subcategory: fields.subcategory.clone(),
                product_types: fields.product_types.clone(),
                parameters: vec![],
                localizations: vec![LocalizationRef {
                    id: id.clone(),
                    locale: source_locale,
                }],
            },
        ));
        for (_, p) in &mut state.products {
            if p.id == *id {
                p.localizations.push(LocalizationRef {
                    id: peer_id.clone(),
                    locale,
                });
            }
        }
        state.writes += 1;
        Ok(LinkOutcome::Created(peer_id))
    }

    async fn list_products(
        &self,
        locale: Locale,
        page: u32,
        page_size: u32,
    ) -> Result<Page<Product>, RemoteError> {
        let state = self.state.lock().unwrap();
        let items: Vec<_> = state
            .products
            .iter()
            .filter(|(l, _)| *l == locale)
            .map(|(_, p)| p.clone())
            .collect();
        Ok(paginate(items, page, page_size))
    }

    async fn product_parameters(
        &self,
        product: &EntityId,
        _locale: Locale,
    ) -> Result<Vec<ProductParameter>, RemoteError> {
        let state = self.state.lock().unwrap();
        Ok(state.joins.get(product.as_str()).cloned().unwrap_or_default())
    }

    async fn create_product_parameter(
        &self,
        product: &EntityId,
        parameter_value: &EntityId,
        _locale: Locale,
    ) -> Result<LinkOutcome, RemoteError> {
        let mut state = self.state.lock().unwrap();
        let existing = state
            .joins
            .get(product.as_str())
            .is_some_and(|joins| joins.iter().any(|j| j.parameter_value == *parameter_value));
        if existing {
            return Ok(LinkOutcome::AlreadyExists(None));
        }
        let id = state.fresh_id();
        state
            .joins
            .entry(product.as_str().to_string())
            .or_default()
            .push(ProductParameter {
                id: id.clone(),
                parameter_value: parameter_value.clone(),
            });
        state.writes += 1;
        Ok(LinkOutcome::Created(id))
    }

    async fn localization_of(
        &self,
        kind: EntityKind,
        id: &EntityId,
        target: Locale,
    ) -> Result<Option<EntityId>, RemoteError> {
        let state = self.state.lock().unwrap();
        let peer = match kind {
            EntityKind::ParameterValue => state
                .values
                .iter()
                .find(|(_, v)| v.id == *id)
                .and_then(|(_, v)| v.localization(target).cloned()),
            EntityKind::Product => state
                .products
                .iter()
                .find(|(_, p)| p.id == *id)
                .and_then(|(_, p)| p.localization(target).cloned()),
            _ => state.peers.get(&(kind, id.as_str().to_string())).cloned(),
        };
        Ok(peer)
    }
}

/// Provider fake with a shared call counter; answers from a canned map or
/// by tagging the source text.
#[derive(Clone, Default)]
struct MapTranslator {
    calls: Arc<AtomicUsize>,
    map: Arc<HashMap<String, String>>,
}

impl MapTranslator {
    fn with_map(entries: &[(&str, &str)]) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            map: Arc::new(
                entries
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
            ),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TranslationProvider for MapTranslator {
    async fn translate_raw(
        &self,
        text: &str,
        _pair: LocalePair,
    ) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .map
            .get(text)
            .cloned()
            .unwrap_or_else(|| format!("{text} пер")))
    }
}

fn pair() -> LocalePair {
    LocalePair::new(Locale::Uk, Locale::Ru).unwrap()
}

fn engine(
    catalog: FakeCatalog,
    translator: MapTranslator,
) -> ReconcileEngine<FakeCatalog, MapTranslator> {
    let gateway =
        TranslationGateway::with_overrides(translator, Duration::ZERO, TermOverrides::empty());
    ReconcileEngine::new(catalog, gateway, pair())
}

fn product(part_number: &str, title: &str) -> Product {
    Product {
        id: EntityId::new(""),
        part_number: part_number.to_string(),
        title: title.to_string(),
        description: None,
        retail: None,
        currency: None,
        slug: None,
        image_link: None,
        additional_images: vec![],
        media_archive: None,
        subcategory: None,
        product_types: vec![],
        parameters: vec![],
        localizations: vec![],
    }
}

#[tokio::test]
async fn test_parameter_type_batch_is_idempotent() {
    let catalog = FakeCatalog::default();
    catalog.seed_type(Locale::Uk, "Колір", "kolir");
    catalog.seed_type(Locale::Uk, "Переріз", "pereriz");
    catalog.seed_type(Locale::Uk, "Матеріал", "material");

    let driver = BatchDriver::new(engine(catalog.clone(), MapTranslator::default()), 2);
    let first = driver.sync_parameter_types().await.unwrap();
    assert_eq!(first.succeeded, 3);
    assert_eq!(first.failed, 0);
    assert_eq!(catalog.writes(), 3);

    // A fresh run over the same backend state writes nothing.
    let driver = BatchDriver::new(engine(catalog.clone(), MapTranslator::default()), 2);
    let second = driver.sync_parameter_types().await.unwrap();
    assert_eq!(second.succeeded, 0);
    assert_eq!(second.already_exists, 3);
    assert_eq!(catalog.writes(), 3);
}

#[tokio::test]
async fn test_find_or_create_parameter_type_creates_both_locales() {
    let catalog = FakeCatalog::default();
    let translator = MapTranslator::with_map(&[("Колір", "Цвет")]);
    let engine = engine(catalog.clone(), translator.clone());

    let id = engine.find_or_create_parameter_type("Колір").await.unwrap();
    assert_eq!(catalog.writes(), 2);
    assert_eq!(translator.calls(), 1);
    {
        let state = catalog.state.lock().unwrap();
        let (_, ru) = state
            .types
            .iter()
            .find(|(l, _)| *l == Locale::Ru)
            .expect("peer created");
        assert_eq!(ru.name, "Цвет");
        assert_eq!(ru.slug, "kolir");
    }

    // Same run, same key: served from the cache, no further traffic.
    let again = engine.find_or_create_parameter_type("Колір").await.unwrap();
    assert_eq!(again, id);
    assert_eq!(catalog.writes(), 2);
    assert_eq!(translator.calls(), 1);
}

#[tokio::test]
async fn test_value_without_type_peer_is_skipped_before_any_write() {
    let catalog = FakeCatalog::default();
    let type_id = catalog.seed_type(Locale::Uk, "Колір", "kolir");
    catalog.seed_value(Locale::Uk, "Білий", "bilij-1", Some(&type_id));

    let engine = engine(catalog.clone(), MapTranslator::default());
    let err = engine
        .find_or_create_parameter_value(&type_id, "Білий")
        .await
        .unwrap_err();

    assert!(err.is_skip());
    assert!(matches!(
        err,
        SyncError::MissingDependency {
            kind: EntityKind::ParameterValue,
            dependency: EntityKind::ParameterType,
            ..
        }
    ));
    assert_eq!(catalog.writes(), 0, "dependency check precedes every write");
}

#[tokio::test]
async fn test_value_peer_is_wired_to_localized_type() {
    let catalog = FakeCatalog::default();
    let (uk_type, _ru_type) = catalog.seed_type_pair("Колір", "Цвет", "kolir");
    let translator = MapTranslator::with_map(&[("Білий", "Белый")]);

    let engine = engine(catalog.clone(), translator.clone());
    engine
        .find_or_create_parameter_value(&uk_type, "Білий")
        .await
        .unwrap();

    // Source value plus its peer.
    assert_eq!(catalog.writes(), 2);
    let state = catalog.state.lock().unwrap();
    let (_, ru) = state
        .values
        .iter()
        .find(|(l, _)| *l == Locale::Ru)
        .expect("peer created");
    assert_eq!(ru.value, "Белый");
    let (_, uk) = state.values.iter().find(|(l, _)| *l == Locale::Uk).unwrap();
    assert_eq!(ru.code, uk.code, "code survives localization unchanged");
}

#[tokio::test]
async fn test_untranslatable_value_passes_through_without_provider_call() {
    let catalog = FakeCatalog::default();
    let (uk_type, _) = catalog.seed_type_pair("Переріз", "Сечение", "pereriz");
    let translator = MapTranslator::default();

    let engine = engine(catalog.clone(), translator.clone());
    engine
        .find_or_create_parameter_value(&uk_type, "2x0.75")
        .await
        .unwrap();

    assert_eq!(translator.calls(), 0);
    let state = catalog.state.lock().unwrap();
    let (_, ru) = state
        .values
        .iter()
        .find(|(l, _)| *l == Locale::Ru)
        .expect("peer created");
    assert_eq!(ru.value, "2x0.75");
}

#[tokio::test]
async fn test_product_localization_drops_unresolved_relations() {
    let catalog = FakeCatalog::default();
    let subcategory = EntityId::new("900");
    let known_type = EntityId::new("901");
    let known_type_peer = EntityId::new("902");
    catalog.seed_peer(EntityKind::ProductType, &known_type, &known_type_peer);

    let mut item = product("KBL-100", "Кабель мідний");
    item.subcategory = Some(subcategory);
    item.product_types = vec![known_type];
    let id = catalog.seed_product(Locale::Uk, item);

    let engine = engine(catalog.clone(), MapTranslator::default());
    let source = catalog
        .product_by_part_number("KBL-100", Locale::Uk)
        .await
        .unwrap()
        .unwrap();
    let outcome = engine.localize_product(&source).await.unwrap();
    assert_eq!(outcome, Outcome::Created);

    let state = catalog.state.lock().unwrap();
    let (_, ru) = state
        .products
        .iter()
        .find(|(l, p)| *l == Locale::Ru && p.part_number == "KBL-100")
        .expect("peer created");
    assert_eq!(ru.subcategory, None, "unresolvable relation is dropped");
    assert_eq!(ru.product_types, vec![known_type_peer]);
    assert!(ru.slug.as_deref().unwrap().ends_with("-ru"));
    let (_, uk) = state.products.iter().find(|(_, p)| p.id == id).unwrap();
    assert!(uk.localization(Locale::Ru).is_some());
}

#[tokio::test]
async fn test_localized_product_is_left_alone() {
    let catalog = FakeCatalog::default();
    let uk = catalog.seed_product(Locale::Uk, product("KBL-200", "Кабель"));
    let ru = catalog.seed_product(Locale::Ru, product("KBL-200", "Кабель пер"));
    catalog.link(&uk, Locale::Uk, &ru, Locale::Ru);

    let translator = MapTranslator::default();
    let engine = engine(catalog.clone(), translator.clone());
    let source = catalog
        .product_by_part_number("KBL-200", Locale::Uk)
        .await
        .unwrap()
        .unwrap();

    let outcome = engine.localize_product(&source).await.unwrap();
    assert_eq!(outcome, Outcome::AlreadyExists);
    assert_eq!(catalog.writes(), 0);
    assert_eq!(translator.calls(), 0, "no translation for an existing peer");
}

#[tokio::test]
async fn test_backend_duplicate_answer_counts_as_already_exists() {
    let catalog = FakeCatalog::default();
    // An unlinked target-locale record with the same part number: the local
    // peer check cannot see it, the backend's uniqueness constraint can.
    catalog.seed_product(Locale::Uk, product("KBL-300", "Кабель"));
    catalog.seed_product(Locale::Ru, product("KBL-300", "Кабель пер"));

    let engine = engine(catalog.clone(), MapTranslator::default());
    let source = catalog
        .product_by_part_number("KBL-300", Locale::Uk)
        .await
        .unwrap()
        .unwrap();

    let outcome = engine.localize_product(&source).await.unwrap();
    assert_eq!(outcome, Outcome::AlreadyExists);
    assert_eq!(catalog.writes(), 0);
}

#[tokio::test]
async fn test_link_product_parameters_is_idempotent() {
    let catalog = FakeCatalog::default();
    let uk_value_a = catalog.seed_value(Locale::Uk, "Білий", "bilij-1", None);
    let ru_value_a = catalog.seed_value(Locale::Ru, "Белый", "bilij-1", None);
    catalog.link(&uk_value_a, Locale::Uk, &ru_value_a, Locale::Ru);
    let uk_value_b = catalog.seed_value(Locale::Uk, "Чорний", "chornij-1", None);
    let ru_value_b = catalog.seed_value(Locale::Ru, "Чёрный", "chornij-1", None);
    catalog.link(&uk_value_b, Locale::Uk, &ru_value_b, Locale::Ru);

    let mut item = product("KBL-400", "Кабель");
    item.parameters = vec![
        ProductParameter {
            id: EntityId::new("j1"),
            parameter_value: uk_value_a,
        },
        ProductParameter {
            id: EntityId::new("j2"),
            parameter_value: uk_value_b,
        },
    ];
    let uk = catalog.seed_product(Locale::Uk, item);
    let ru = catalog.seed_product(Locale::Ru, product("KBL-400", "Кабель пер"));
    catalog.link(&uk, Locale::Uk, &ru, Locale::Ru);

    let engine_one = engine(catalog.clone(), MapTranslator::default());
    let source = catalog
        .product_by_part_number("KBL-400", Locale::Uk)
        .await
        .unwrap()
        .unwrap();
    let first = engine_one.link_product_parameters(&source).await.unwrap();
    assert_eq!(first.succeeded, 2);
    assert_eq!(catalog.writes(), 2);

    let engine_two = engine(catalog.clone(), MapTranslator::default());
    let second = engine_two.link_product_parameters(&source).await.unwrap();
    assert_eq!(second.succeeded, 0);
    assert_eq!(second.already_exists, 2);
    assert_eq!(catalog.writes(), 2);
}

#[tokio::test]
async fn test_link_skips_value_without_peer() {
    let catalog = FakeCatalog::default();
    let uk_value = catalog.seed_value(Locale::Uk, "Білий", "bilij-1", None);

    let mut item = product("KBL-500", "Кабель");
    item.parameters = vec![ProductParameter {
        id: EntityId::new("j1"),
        parameter_value: uk_value,
    }];
    let uk = catalog.seed_product(Locale::Uk, item);
    let ru = catalog.seed_product(Locale::Ru, product("KBL-500", "Кабель пер"));
    catalog.link(&uk, Locale::Uk, &ru, Locale::Ru);

    let engine = engine(catalog.clone(), MapTranslator::default());
    let source = catalog
        .product_by_part_number("KBL-500", Locale::Uk)
        .await
        .unwrap()
        .unwrap();
    let report = engine.link_product_parameters(&source).await.unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.succeeded, 0);
    assert_eq!(catalog.writes(), 0);
}

#[tokio::test]
async fn test_all_passes_localize_values_and_joins() {
    let catalog = FakeCatalog::default();
    let uk_type = catalog.seed_type(Locale::Uk, "Колір", "kolir");
    let uk_value = catalog.seed_value(Locale::Uk, "Білий", "bilij-1", Some(&uk_type));
    let mut item = product("KBL-600", "Кабель");
    item.parameters = vec![ProductParameter {
        id: EntityId::new("j1"),
        parameter_value: uk_value,
    }];
    catalog.seed_product(Locale::Uk, item);

    let translator = MapTranslator::with_map(&[("Колір", "Цвет"), ("Білий", "Белый")]);
    let driver = BatchDriver::new(engine(catalog.clone(), translator), 10);

    // Full run in dependency order: a bare source catalog comes out with a
    // value peer and a mirrored join, not just type and product peers.
    let mut result = driver.sync_parameter_types().await.unwrap();
    result.merge(driver.sync_parameter_values().await.unwrap());
    result.merge(driver.sync_products().await.unwrap());
    result.merge(driver.sync_product_parameters().await.unwrap());

    assert_eq!(result.succeeded, 4, "type, value, product and join peers");
    assert_eq!(result.skipped, 0);
    assert_eq!(result.failed, 0);
    assert_eq!(catalog.writes(), 4);

    let state = catalog.state.lock().unwrap();
    let (_, ru_value) = state
        .values
        .iter()
        .find(|(l, _)| *l == Locale::Ru)
        .expect("value peer created");
    assert_eq!(ru_value.value, "Белый");
    let (_, ru_product) = state
        .products
        .iter()
        .find(|(l, _)| *l == Locale::Ru)
        .expect("product peer created");
    assert_eq!(
        state.joins.get(ru_product.id.as_str()).map(Vec::len),
        Some(1),
        "join mirrored onto the localized product"
    );
}

#[tokio::test]
async fn test_value_batch_skips_value_without_owning_type() {
    let catalog = FakeCatalog::default();
    catalog.seed_value(Locale::Uk, "Білий", "bilij-1", None);

    let driver = BatchDriver::new(engine(catalog.clone(), MapTranslator::default()), 10);
    let result = driver.sync_parameter_values().await.unwrap();

    assert_eq!(result.skipped, 1);
    assert_eq!(result.succeeded, 0);
    assert_eq!(result.failed, 0);
    assert_eq!(catalog.writes(), 0);
}

#[tokio::test]
async fn test_prewarmed_cache_short_circuits_resolution() {
    let catalog = FakeCatalog::default();
    let cache = LocalizationCache::new();
    cache
        .insert(
            CacheKey::natural(EntityKind::ParameterType, "Колір", Locale::Uk),
            EntityId::new("77"),
        )
        .await;

    let translator = MapTranslator::default();
    let gateway = TranslationGateway::with_overrides(
        translator.clone(),
        Duration::ZERO,
        TermOverrides::empty(),
    );
    let engine = ReconcileEngine::with_cache(catalog.clone(), gateway, pair(), cache);

    let id = engine.find_or_create_parameter_type("Колір").await.unwrap();
    assert_eq!(id, EntityId::new("77"));
    assert_eq!(catalog.writes(), 0, "resolution came from the handed-in cache");
    assert_eq!(translator.calls(), 0);
}

#[tokio::test]
async fn test_product_batch_completes_through_item_failures() {
    let catalog = FakeCatalog::default();
    for i in 1..=10 {
        catalog.seed_product(Locale::Uk, product(&format!("KBL-{i:03}"), "Кабель"));
    }
    catalog.fail_product("KBL-004");

    let driver = BatchDriver::new(engine(catalog.clone(), MapTranslator::default()), 3);
    let result = driver.sync_products().await.unwrap();

    assert_eq!(result.succeeded, 9);
    assert_eq!(result.failed, 1);
    assert!(result.has_failures());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].key, "KBL-004");
    assert_eq!(result.errors[0].kind, EntityKind::Product);
}
