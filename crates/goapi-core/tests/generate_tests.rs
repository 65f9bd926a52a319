use goapi_core::config::{AllOfStrategy, GoapiConfig, ServerFramework, TargetKind};
use goapi_core::ir::{DeclarationBody, GoImport};
use goapi_core::model;
use goapi_core::{GenerationOutput, Generator};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn generate(config: &GoapiConfig) -> GenerationOutput {
    let spec = model::from_yaml(PETSTORE).unwrap();
    Generator::new(config).generate(&spec)
}

#[test]
fn load_petstore() {
    let spec = model::from_yaml(PETSTORE).unwrap();
    assert_eq!(spec.info.title, "Petstore");
    assert_eq!(spec.schemas.len(), 10);
    assert_eq!(spec.operations.len(), 6);
    assert_eq!(spec.operations[0].parameters.len(), 2);
}

#[test]
fn prescan_binds_enum_names() {
    let spec = model::from_yaml(PETSTORE).unwrap();
    let config = GoapiConfig::default();
    let registry = Generator::new(&config).prescan(&spec);

    let bindings: Vec<String> = registry
        .bindings()
        .iter()
        .map(|(name, key)| format!("{name}={key}"))
        .collect();
    insta::assert_snapshot!(
        bindings.join(" "),
        @"Mode=dark|light Status=approved|delivered|placed StatusAvailablePending=available|pending|sold"
    );
}

#[test]
fn types_target_declarations() {
    let output = generate(&GoapiConfig::default());
    let types = output.target(TargetKind::Types).unwrap();

    insta::assert_snapshot!(
        types.declaration_names().join(" "),
        @"StatusAvailablePending PetTagsItem Pet NewPet Mode UserPreferences User Status Order Shape Circle Square PetList Labels Error"
    );
    assert_eq!(
        types.imports,
        vec![
            GoImport::new("github.com/shopspring/decimal"),
            GoImport::new("time"),
        ]
    );

    let pet = types.declaration("Pet").unwrap();
    assert_eq!(pet.description.as_deref(), Some("A pet for sale"));
    let fields: Vec<String> = pet
        .fields()
        .iter()
        .map(|f| format!("{} {}", f.go_name, f.go_type))
        .collect();
    assert_eq!(
        fields,
        vec![
            "ID int64",
            "Name string",
            "Status *StatusAvailablePending",
            "Tags []PetTagsItem",
            "Owner User",
            "Birthday *time.Time",
        ]
    );
    assert_eq!(pet.field("id").unwrap().tags, r#"json:"id""#);
    assert_eq!(pet.field("status").unwrap().tags, r#"json:"status,omitempty""#);

    let order = types.declaration("Order").unwrap();
    assert_eq!(
        order.field("price").unwrap().go_type.to_string(),
        "decimal.Decimal"
    );
    assert_eq!(order.field("petId").unwrap().go_name, "PetID");
}

#[test]
fn component_aliases() {
    let output = generate(&GoapiConfig::default());
    let types = output.target(TargetKind::Types).unwrap();

    for (name, target) in [("PetList", "[]Pet"), ("Labels", "map[string]string")] {
        let decl = types.declaration(name).unwrap();
        let DeclarationBody::Alias(alias) = &decl.body else {
            panic!("{name} should be an alias");
        };
        assert_eq!(alias.target.to_string(), target);
    }
}

#[test]
fn discriminated_union() {
    let output = generate(&GoapiConfig::default());
    let shape = output
        .target(TargetKind::Types)
        .unwrap()
        .declaration("Shape")
        .unwrap();
    let DeclarationBody::Union(union) = &shape.body else {
        panic!("Shape should be a union");
    };
    assert_eq!(union.discriminator_property.as_deref(), Some("kind"));
    let bound: Vec<(String, Option<&str>)> = union
        .variants
        .iter()
        .map(|v| (v.type_ref.to_string(), v.discriminator_value.as_deref()))
        .collect();
    assert_eq!(
        bound,
        vec![
            ("Circle".to_string(), Some("circle")),
            ("Square".to_string(), Some("square")),
        ]
    );
}

#[test]
fn all_of_embed_and_flatten() {
    let output = generate(&GoapiConfig::default());
    let new_pet = output
        .target(TargetKind::Types)
        .unwrap()
        .declaration("NewPet")
        .unwrap();
    let DeclarationBody::AllOf(all_of) = &new_pet.body else {
        panic!("NewPet should embed Pet");
    };
    assert_eq!(all_of.embeds.len(), 1);
    assert_eq!(all_of.embeds[0].to_string(), "Pet");
    assert_eq!(all_of.fields.len(), 1);
    assert!(all_of.fields[0].required);

    let mut config = GoapiConfig::default();
    config.go.types.all_of_strategy = AllOfStrategy::Flatten;
    let output = generate(&config);
    let types = output.target(TargetKind::Types).unwrap();
    let new_pet = types.declaration("NewPet").unwrap();
    assert_eq!(new_pet.kind(), "object");
    let names: Vec<&str> = new_pet.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "name", "status", "tags", "owner", "birthday", "nickname"]
    );
    assert!(new_pet.field("nickname").unwrap().required);
    assert!(new_pet.field("id").unwrap().required);
    assert!(types.declaration("NewPetTagsItem").is_some());
}

#[test]
fn enum_names_are_stable_across_targets() {
    let output = generate(&GoapiConfig::default());
    let types = output.target(TargetKind::Types).unwrap();
    let pet_status = types.declaration("Pet").unwrap().field("status").unwrap();

    for kind in [TargetKind::Server, TargetKind::StrictServer, TargetKind::Client] {
        let target = output.target(kind).unwrap();
        let list = target.operation("listPets").unwrap();
        assert_eq!(list.parameters[1].go_type, pet_status.base_type);
        // Emitted once, by the types session.
        assert!(target.declaration("StatusAvailablePending").is_none());
        assert!(target.declaration("Mode").is_none());
    }
}

#[test]
fn operation_types() {
    let output = generate(&GoapiConfig::default());
    let client = output.target(TargetKind::Client).unwrap();

    let list = client.operation("listPets").unwrap();
    assert_eq!(list.go_name, "ListPets");
    assert_eq!(list.method, "GET");
    assert!(list.route.is_none());
    assert_eq!(list.parameters[0].go_type.to_string(), "int32");
    assert!(!list.parameters[0].required);
    let responses: Vec<String> = list
        .responses
        .iter()
        .map(|r| format!("{} {}", r.status, r.go_type.as_ref().unwrap()))
        .collect();
    assert_eq!(responses, vec!["200 PetList", "default Error"]);

    let show = client.operation("showPetById").unwrap();
    assert_eq!(show.go_name, "ShowPetByID");
    assert!(show.parameters[0].required);

    let inventory = client.operation("getInventory").unwrap();
    assert_eq!(
        inventory.responses[0].go_type.as_ref().unwrap().to_string(),
        "map[string]int32"
    );

    let upload = client.operation("uploadPhoto").unwrap();
    let body = upload.request_body.as_ref().unwrap();
    assert_eq!(body.media_type, "multipart/form-data");
    assert_eq!(body.go_type.to_string(), "UploadPhotoBody");
    assert!(upload.parameters[0].required);
    assert!(upload.responses[0].go_type.is_none());

    let decl = client.declaration("UploadPhotoBody").unwrap();
    assert_eq!(decl.field("file").unwrap().go_type.to_string(), "*[]byte");
    assert_eq!(decl.field("mode").unwrap().base_type.to_string(), "Mode");
}

#[test]
fn strict_server_names() {
    let output = generate(&GoapiConfig::default());
    let strict = output.target(TargetKind::StrictServer).unwrap();
    let list = strict.operation("listPets").unwrap();

    assert_eq!(list.request_object.as_deref(), Some("ListPetsRequestObject"));
    assert_eq!(list.response_object.as_deref(), Some("ListPetsResponseObject"));
    let names: Vec<&str> = list
        .responses
        .iter()
        .filter_map(|r| r.response_name.as_deref())
        .collect();
    assert_eq!(
        names,
        vec!["ListPets200JSONResponse", "ListPetsDefaultJSONResponse"]
    );

    let upload = strict.operation("uploadPhoto").unwrap();
    assert_eq!(
        upload.responses[0].response_name.as_deref(),
        Some("UploadPhoto204Response")
    );

    let server = output.target(TargetKind::Server).unwrap();
    assert!(server.operation("listPets").unwrap().request_object.is_none());
}

#[test]
fn echo_routes() {
    let mut config = GoapiConfig::default();
    config.go.server_framework = ServerFramework::Echo;
    let output = generate(&config);

    let server = output.target(TargetKind::Server).unwrap();
    let route = server.operation("uploadPhoto").unwrap().route.as_deref();
    assert_eq!(route, Some("/pets/:petId/photo"));
    let stdlib = generate(&GoapiConfig::default());
    let route = stdlib
        .target(TargetKind::StrictServer)
        .unwrap()
        .operation("showPetById")
        .unwrap()
        .route
        .as_deref();
    assert_eq!(route, Some("/pets/{petId}"));
}

#[test]
fn filters_and_target_selection() {
    let mut config = GoapiConfig {
        exclude_tags: vec!["internal".to_string()],
        exclude_schemas: vec!["Order".to_string()],
        ..GoapiConfig::default()
    };
    config.go.targets = vec![TargetKind::Client, TargetKind::Types];
    let output = generate(&config);

    let kinds: Vec<TargetKind> = output.targets.iter().map(|t| t.target).collect();
    assert_eq!(kinds, vec![TargetKind::Client, TargetKind::Types]);

    let client = output.target(TargetKind::Client).unwrap();
    assert!(client.operation("rebuildIndex").is_none());
    assert_eq!(client.operations.len(), 5);

    // Without Order, the pet status set no longer collides.
    let types = output.target(TargetKind::Types).unwrap();
    assert!(types.declaration("Order").is_none());
    let status = types.declaration("Pet").unwrap().field("status").unwrap();
    assert_eq!(status.base_type.to_string(), "Status");

    // The client ran first, so it emitted the shared enums.
    assert!(client.declaration("Status").is_some());
    assert!(client.declaration("Mode").is_some());
    assert!(types.declaration("Status").is_none());
    assert!(types.declaration("Mode").is_none());
}

#[test]
fn generation_is_deterministic() {
    let config = GoapiConfig::default();
    let first = serde_json::to_string(&generate(&config)).unwrap();
    let second = serde_json::to_string(&generate(&config)).unwrap();
    assert_eq!(first, second);
}
