mod support;
mod type_resolver;
