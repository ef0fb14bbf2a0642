use std::sync::Arc;

use iregistry::{get_instance, BasicContainer, ContainerExt, Injectable, RegistryError};

#[derive(Injectable)]
pub struct Controller {
    #[inject(name = "controller.value")]
    value: Arc<i32>,
}

#[test]
fn test_basic() {
    let container = BasicContainer::new();
    container.provide("controller.value", 123i32);

    let controller = Controller::inject(&container).unwrap();
    assert_eq!(*controller.value, 123);
}

pub struct Dep {
    greeting: String,
}

impl Dep {
    pub fn welcome(&self) -> String {
        format!("welcome, {}", self.greeting)
    }
}

#[derive(Injectable)]
pub struct ControllerWithInject {
    #[inject]
    dep: Arc<Dep>,
    #[inject(name = "limits.max")]
    max: Option<Arc<u64>>,
    retries: u8,
}

#[test]
fn test_basic_inject() {
    let container = BasicContainer::new();
    let dep = Arc::new(Dep { greeting: "guest".to_string() });
    container.provide_shared("dep", Arc::clone(&dep));

    let cc = ControllerWithInject::inject(&container).unwrap();
    assert!(Arc::ptr_eq(&cc.dep, &dep));
    assert_eq!(cc.dep.welcome(), "welcome, guest");
    assert!(cc.max.is_none());
    assert_eq!(cc.retries, 0);

    container.provide("limits.max", 10u64);
    let cc = ControllerWithInject::inject(&container).unwrap();
    assert_eq!(cc.max.as_deref(), Some(&10));
}

#[test]
fn test_inject_missing_dependency() {
    let container = BasicContainer::new();
    let err = ControllerWithInject::inject(&container).err().unwrap();
    assert_eq!(err, RegistryError::NotFound("dep".to_string()));
}

#[test]
fn test_inject_wrong_type() {
    let container = BasicContainer::new();
    container.provide("dep", Dep { greeting: "x".into() });
    container.provide("limits.max", "ten".to_string());

    match ControllerWithInject::inject(&container) {
        Err(RegistryError::TypeMismatch { name, .. }) => assert_eq!(name, "limits.max"),
        Err(other) => panic!("unexpected error: {}", other),
        Ok(_) => panic!("expected a type mismatch"),
    }
}

#[derive(Injectable)]
struct Holder<T> {
    #[inject(name = "holder.inner")]
    inner: Arc<T>,
}

#[test]
fn test_generic_inject() {
    let container = BasicContainer::new();
    container.provide("holder.inner", vec![1u8, 2, 3]);

    let holder = Holder::<Vec<u8>>::inject(&container).unwrap();
    assert_eq!(holder.inner.as_slice(), &[1, 2, 3]);
}

#[derive(Injectable)]
struct Settings {
    #[inject(name = "basic.settings.name")]
    name: Arc<String>,
}

#[test]
fn test_from_global() {
    let _ = env_logger::builder().is_test(true).try_init();

    get_instance().provide("basic.settings.name", String::from("app"));
    let settings = Settings::from_global().unwrap();
    assert_eq!(settings.name.as_str(), "app");
}
