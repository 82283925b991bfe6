//! The same registry scenarios run against every backend.

use cadastro::api::RegistryApi;
use cadastro::commands::{SortOrder, StatusFilter};
use cadastro::error::{CadastroError, Field};
use cadastro::model::{Address, AddressPatch, ClientPatch, NewClient};
use cadastro::store::document::DocumentStore;
use cadastro::store::file::FileStore;
use cadastro::store::memory::MemoryCollection;
use cadastro::store::ClientStore;
use tempfile::TempDir;

/// Keeps the temp dir alive as long as the store that lives in it.
struct Fixture {
    api: RegistryApi<Box<dyn ClientStore>>,
    _dir: Option<TempDir>,
}

fn file_backend() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("clientes.json")).unwrap();
    Fixture {
        api: RegistryApi::new(Box::new(store)),
        _dir: Some(dir),
    }
}

fn memory_backend() -> Fixture {
    let store = DocumentStore::open(MemoryCollection::new("clientes")).unwrap();
    Fixture {
        api: RegistryApi::new(Box::new(store)),
        _dir: None,
    }
}

fn dir_backend() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = DocumentStore::open_dir(dir.path().join("documents")).unwrap();
    Fixture {
        api: RegistryApi::new(Box::new(store)),
        _dir: Some(dir),
    }
}

fn backends() -> Vec<(&'static str, Fixture)> {
    vec![
        ("file", file_backend()),
        ("memory", memory_backend()),
        ("dir", dir_backend()),
    ]
}

#[test]
fn create_then_find_by_any_punctuation() {
    for (label, mut fx) in backends() {
        let created = fx
            .api
            .create(NewClient::new("Ana Costa", "12345678909").with_email("Ana@Example.com"))
            .unwrap();
        let record = &created.affected[0];
        assert_eq!(record.tax_id.as_str(), "123.456.789-09", "{label}");
        assert_eq!(record.email.as_deref(), Some("ana@example.com"), "{label}");
        assert!(record.active, "{label}");

        for form in ["123.456.789-09", "12345678909", " 123 456 789 09 "] {
            let shown = fx.api.show(form).unwrap();
            assert_eq!(shown.listed[0].id, record.id, "{label}: {form}");
        }
        let by_id = fx.api.find_by_id(&record.id).unwrap();
        assert_eq!(by_id.listed[0].name, "Ana Costa", "{label}");
    }
}

#[test]
fn rejects_invalid_and_duplicate_input_without_writing() {
    for (label, mut fx) in backends() {
        fx.api.create(NewClient::new("Ana", "123.456.789-09")).unwrap();

        let cases = [
            NewClient::new("", "111.444.777-35"),
            NewClient::new("Bia", ""),
            NewClient::new("B", "111.444.777-35"),
            NewClient::new("Bia", "555.666.777.88"),
            NewClient::new("Bia", "111.111.111-11"),
            NewClient::new("Bia", "111.444.777-35").with_email("not-an-email"),
            NewClient::new("Clone", "12345678909"),
        ];
        for input in cases {
            let err = fx.api.create(input).unwrap_err();
            assert!(err.is_validation(), "{label}: {err}");
        }
        assert!(matches!(
            fx.api.create(NewClient::new("", "1")),
            Err(CadastroError::MissingField(Field::Name))
        ));
        assert!(matches!(
            fx.api.create(NewClient::new("Clone", "123.456.789-09")),
            Err(CadastroError::DuplicateTaxId(_))
        ));

        let all = fx.api.list(StatusFilter::All, SortOrder::Natural).unwrap();
        assert_eq!(all.listed.len(), 1, "{label}");
    }
}

#[test]
fn update_merges_and_guards_tax_id() {
    for (label, mut fx) in backends() {
        let recife = Address {
            street: Some("Rua A".into()),
            city: Some("Recife".into()),
            ..Default::default()
        };
        fx.api
            .create(
                NewClient::new("Ana", "123.456.789-09")
                    .with_phone("81 9999-0000")
                    .with_address(recife),
            )
            .unwrap();
        fx.api.create(NewClient::new("Bia", "111.444.777-35")).unwrap();

        let patch = ClientPatch::new()
            .name("Ana Maria")
            .phone("")
            .address(AddressPatch {
                city: Some("Olinda".into()),
                ..Default::default()
            });
        let updated = fx.api.update("123.456.789-09", &patch).unwrap();
        let record = &updated.affected[0];
        assert_eq!(record.name, "Ana Maria", "{label}");
        assert_eq!(record.phone, None, "{label}");
        let address = record.address.as_ref().unwrap();
        assert_eq!(address.street.as_deref(), Some("Rua A"), "{label}");
        assert_eq!(address.city.as_deref(), Some("Olinda"), "{label}");
        assert!(record.updated_at.is_some(), "{label}");

        assert!(matches!(
            fx.api
                .update("123.456.789-09", &ClientPatch::new().tax_id("111.444.777-35")),
            Err(CadastroError::DuplicateTaxId(_))
        ));
        assert!(matches!(
            fx.api.update("123.456.789-09", &ClientPatch::new().tax_id("123.456.789-00")),
            Err(CadastroError::InvalidTaxId(_))
        ));

        let moved = fx
            .api
            .update("123.456.789-09", &ClientPatch::new().tax_id("52998224725"))
            .unwrap();
        assert_eq!(moved.affected[0].tax_id.as_str(), "529.982.247-25", "{label}");
        assert!(fx.api.show("123.456.789-09").is_err(), "{label}");
    }
}

#[test]
fn soft_delete_reactivate_and_hard_delete() {
    for (label, mut fx) in backends() {
        fx.api.create(NewClient::new("Ana", "123.456.789-09")).unwrap();

        let removed = fx.api.remove("123.456.789-09", false).unwrap();
        let record = &removed.affected[0];
        assert!(!record.active, "{label}");
        assert!(record.deactivated_at.is_some(), "{label}");

        // Inactive clients still hold their CPF.
        assert!(matches!(
            fx.api.create(NewClient::new("Other", "123.456.789-09")),
            Err(CadastroError::DuplicateTaxId(_))
        ));
        assert!(matches!(
            fx.api.remove("123.456.789-09", false),
            Err(CadastroError::AlreadyInactive(_))
        ));

        let inactive = fx.api.list(StatusFilter::Inactive, SortOrder::Natural).unwrap();
        assert_eq!(inactive.listed.len(), 1, "{label}");

        let back = fx.api.reactivate("123.456.789-09").unwrap();
        assert!(back.affected[0].active, "{label}");
        assert!(back.affected[0].deactivated_at.is_none(), "{label}");
        assert!(matches!(
            fx.api.reactivate("123.456.789-09"),
            Err(CadastroError::AlreadyActive(_))
        ));

        fx.api.remove("123.456.789-09", true).unwrap();
        assert!(matches!(
            fx.api.show("123.456.789-09"),
            Err(CadastroError::NotFound(_))
        ));
        fx.api.create(NewClient::new("Again", "123.456.789-09")).unwrap();
    }
}

#[test]
fn searches_and_stats_agree() {
    for (label, mut fx) in backends() {
        let city = |name: &str| Address {
            city: Some(name.into()),
            ..Default::default()
        };
        fx.api
            .create(NewClient::new("Mariana", "123.456.789-09").with_address(city("Recife")))
            .unwrap();
        fx.api
            .create(NewClient::new("Ana", "111.444.777-35").with_address(city("Recife")))
            .unwrap();
        fx.api
            .create(
                NewClient::new("Pedro", "529.982.247-25")
                    .with_email("p@example.com")
                    .with_address(city("Natal")),
            )
            .unwrap();
        fx.api.remove("529.982.247-25", false).unwrap();

        let names = |records: &[cadastro::model::ClientRecord]| {
            records.iter().map(|r| r.name.clone()).collect::<Vec<_>>()
        };

        let found = fx.api.search_name("ANA", SortOrder::Name).unwrap();
        assert_eq!(names(&found.listed), vec!["Ana", "Mariana"], "{label}");

        let in_recife = fx.api.search_city("recife").unwrap();
        assert_eq!(names(&in_recife.listed), vec!["Ana", "Mariana"], "{label}");

        let stats = fx.api.stats().unwrap().stats.unwrap();
        assert_eq!(stats.total, 3, "{label}");
        assert_eq!(stats.active, 2, "{label}");
        assert_eq!(stats.inactive, 1, "{label}");
        assert_eq!(stats.with_email, 1, "{label}");
        assert_eq!(stats.top_cities[0], ("Recife".to_string(), 2), "{label}");
    }
}

#[test]
fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clientes.json");
    {
        let mut api = RegistryApi::new(FileStore::open(&path).unwrap());
        api.create(NewClient::new("Ana", "123.456.789-09")).unwrap();
        api.create(NewClient::new("Bia", "111.444.777-35")).unwrap();
    }
    let api = RegistryApi::new(FileStore::open(&path).unwrap());
    let listed = api.list(StatusFilter::All, SortOrder::Natural).unwrap().listed;
    let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ana", "Bia"]);
    assert_eq!(listed[1].id.to_string(), "2");

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"nome\": \"Ana\""));
    assert!(raw.contains("\"cpf\": \"123.456.789-09\""));
}

#[test]
fn dir_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("documents");
    {
        let mut api = RegistryApi::new(DocumentStore::open_dir(&root).unwrap());
        api.create(NewClient::new("Ana", "123.456.789-09")).unwrap();
    }
    let mut api = RegistryApi::new(DocumentStore::open_dir(&root).unwrap());
    assert_eq!(api.show("12345678909").unwrap().listed[0].name, "Ana");
    assert!(matches!(
        api.create(NewClient::new("Clone", "123.456.789-09")),
        Err(CadastroError::DuplicateTaxId(_))
    ));
}

#[test]
fn batch_clear_and_removal_order() {
    for (label, mut fx) in backends() {
        let report = fx
            .api
            .create_many(vec![
                NewClient::new("Ana", "123.456.789-09"),
                NewClient::new("Bia", "111.444.777-35"),
                NewClient::new("Carla", "529.982.247-25"),
                NewClient::new("Clone", "12345678909"),
            ])
            .unwrap();
        assert_eq!(report.affected.len(), 3, "{label}");

        fx.api.remove("123.456.789-09", false).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        fx.api.remove("529.982.247-25", false).unwrap();

        let inactive = fx
            .api
            .list(StatusFilter::Inactive, SortOrder::Deactivated)
            .unwrap();
        let names: Vec<_> = inactive.listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Carla", "Ana"], "{label}");

        let cleared = fx.api.clear().unwrap();
        assert_eq!(cleared.affected.len(), 3, "{label}");
        assert!(
            fx.api
                .list(StatusFilter::All, SortOrder::Natural)
                .unwrap()
                .listed
                .is_empty(),
            "{label}"
        );
    }
}

#[test]
fn unknown_ids_are_not_found() {
    for (label, fx) in backends() {
        assert!(
            matches!(fx.api.show("42"), Err(CadastroError::NotFound(_))),
            "{label}"
        );
        assert!(
            matches!(fx.api.show("no-such-key"), Err(CadastroError::NotFound(_))),
            "{label}"
        );
    }
}

#[test]
fn dir_store_refuses_keys_outside_its_root() {
    let dir = tempfile::tempdir().unwrap();
    let api = RegistryApi::new(DocumentStore::open_dir(dir.path().join("documents")).unwrap());
    assert!(matches!(
        api.show("../clientes"),
        Err(CadastroError::InvalidIdentifier(_))
    ));
}
