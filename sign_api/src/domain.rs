use {crate::new_type, std::sync::Arc};

new_type!(
    #[doc = "Represents the topic type. Session and pairing topics both use it."]
    #[as_ref(forward)]
    #[from(forward)]
    Topic: Arc<str>
);
