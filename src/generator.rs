pub mod options;

pub use options::{
    generator_schema,
    run_generator,
    ApiDocsSource,
    ApiTag,
    GeneratorError,
    GeneratorOptions,
    GeneratorRun,
    TestGenerator,
};
