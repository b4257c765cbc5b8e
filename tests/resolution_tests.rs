//! Resolution of names, description references, defaults and supersets.

mod common;

use common::*;
use metamodel_ir::ast::{Constant, Expr};
use metamodel_ir::ir::{self, DefaultValue, PrimitiveType, ReferenceTarget};
use metamodel_ir::parsed::{
    Argument, Class, Description, Enumeration, Method, Property, Symbol, SymbolTable,
    TypeAnnotation,
};

fn optional_str(name: &str) -> Property {
    Property::new(name, TypeAnnotation::optional(TypeAnnotation::atomic("str")))
}

fn kind() -> Symbol {
    Symbol::Enumeration(
        Enumeration::new("Kind")
            .with_literal("Template", "Template")
            .with_literal("Instance", "Instance"),
    )
}

#[test]
fn dangling_names_of_all_kinds_are_reported_together() {
    let parsed = model(vec![
        Symbol::Class(
            Class::concrete("Something")
                .with_property(Property::new("a", TypeAnnotation::atomic("Missing_a")))
                .with_method(
                    Method::new("compute")
                        .with_argument(Argument::new("c", TypeAnnotation::atomic("Missing_c")))
                        .with_returns(TypeAnnotation::atomic("Missing_b")),
                )
                .with_description(Description::new("Unlike :class:`.Missing_e`.")),
        ),
        Symbol::Enumeration(Enumeration::new("Kind").with_superset_of("Missing_d")),
    ]);
    let outcome = translate_model(&parsed);
    let messages = leaf_messages(&outcome);

    for missing in ["Missing_a", "Missing_b", "Missing_c", "Missing_d", "Missing_e"] {
        assert!(
            messages.iter().any(|message| message.contains(missing)),
            "no error about {missing} in {messages:?}"
        );
    }
    assert_eq!(messages.len(), 5);
}

#[test]
fn dangling_name_in_an_inherited_property_is_reported_once() {
    let parsed = classes(vec![
        Class::abstract_class("Parent").with_property(
            Property::new("p", TypeAnnotation::optional(TypeAnnotation::atomic("Missing")))
                .with_description(Description::new("See :class:`.Nowhere`.")),
        ),
        Class::concrete("First").with_parent("Parent"),
        Class::concrete("Second").with_parent("Parent"),
    ]);
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "The symbol with identifier 'Missing' is not available in the symbol table.",
            "The identifier of the symbol reference could not be found in the symbol table: Nowhere",
        ]
    );
}

#[test]
fn malformed_type_name_is_invalid() {
    let outcome = translate_model(&classes(vec![
        Class::concrete("Something").with_property(Property::new(
            "x",
            TypeAnnotation::optional(TypeAnnotation::atomic("Not valid")),
        )),
    ]));

    assert_eq!(leaf_messages(&outcome), vec!["The symbol is invalid: 'Not valid'"]);
}

#[test]
fn nested_annotations_resolve_to_symbols() {
    let parsed = classes(vec![
        Class::abstract_class("Parent"),
        Class::concrete("Something").with_property(Property::new(
            "parent",
            TypeAnnotation::optional(TypeAnnotation::list(TypeAnnotation::reference(
                TypeAnnotation::atomic("Parent"),
            ))),
        )),
    ]);
    let table = translate_cleanly(&parsed);
    let parent = table.find("Parent").unwrap();
    let property = table.find_class("Something").unwrap().property("parent").unwrap();

    assert_eq!(
        property.type_annotation,
        ir::TypeAnnotation::Optional(Box::new(ir::TypeAnnotation::List(Box::new(
            ir::TypeAnnotation::Ref(Box::new(ir::TypeAnnotation::Our(parent)))
        ))))
    );
    assert_eq!(
        property.type_annotation.display(&table).to_string(),
        "Optional[List[Ref[Parent]]]"
    );
    assert!(property.type_annotation.value_symbols().is_empty());
}

#[test]
fn description_references_resolve() {
    let parsed = model(vec![
        kind(),
        Symbol::Class(Class::abstract_class("Parent").with_property(optional_str("id"))),
        Symbol::Class(
            Class::concrete("Child")
                .with_parent("Parent")
                .with_description(Description::new(
                    "Its :attr:`id` as in :class:`~.Parent`, of :attr:`~Kind.Template`.",
                )),
        ),
    ]);
    let table = translate_cleanly(&parsed);
    let child = table.find("Child").unwrap();
    let description = table.get(child).description().unwrap();

    let targets: Vec<_> = description
        .references
        .iter()
        .map(|reference| reference.target.clone())
        .collect();
    assert_eq!(
        targets,
        vec![
            ReferenceTarget::Property {
                class: child,
                name: "id".into(),
            },
            ReferenceTarget::Symbol(table.find("Parent").unwrap()),
            ReferenceTarget::EnumerationLiteral {
                enumeration: table.find("Kind").unwrap(),
                literal: "Template".into(),
            },
        ]
    );
}

#[test]
fn malformed_and_dangling_description_references_are_all_reported() {
    let parsed = model(vec![
        kind(),
        Symbol::Class(Class::concrete("Something").with_description(Description::new(
            ":class:`Something` :attr:`nope` :attr:`Kind.Nope` :attr:`Nope.x` :attr:`a.b.c`",
        ))),
    ])
    .with_description(Description::new("The meta-model, see :attr:`x`."));
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "The identifier of the symbol reference is invalid: Something; \
             expected an identifier starting with a dot",
            "Dangling reference to a non-existing property of a class 'Something': nope",
            "Dangling reference to a non-existing literal in the enumeration 'Kind': Kind.Nope",
            "Dangling reference to a non-existing symbol: Nope.x",
            "We did not implement the resolution of such a reference to a property or a literal: a.b.c",
            "The attribute reference can not be resolved as there is no encompassing \
             symbol in the given context: x",
        ]
    );
}

#[test]
fn argument_defaults_resolve() {
    let parsed = model(vec![
        kind(),
        Symbol::Class(
            Class::concrete("Something").with_method(
                Method::new("configure")
                    .with_argument(
                        Argument::new("label", TypeAnnotation::atomic("str"))
                            .with_default(Expr::constant(Constant::Str("x".into()), 0..0)),
                    )
                    .with_argument(
                        Argument::new("items", TypeAnnotation::list(TypeAnnotation::atomic("int")))
                            .with_default(Expr::list(vec![], 0..0)),
                    )
                    .with_argument(
                        Argument::new("kind", TypeAnnotation::atomic("Kind"))
                            .with_default(Expr::attribute(name("Kind"), "Instance", 0..0)),
                    ),
            ),
        ),
    ]);
    let table = translate_cleanly(&parsed);
    let method = table.find_class("Something").unwrap().method("configure").unwrap();

    let defaults: Vec<_> = method
        .arguments
        .iter()
        .map(|argument| argument.default.clone())
        .collect();
    assert_eq!(
        defaults,
        vec![
            Some(DefaultValue::Constant(Constant::Str("x".into()))),
            Some(DefaultValue::EmptyList),
            Some(DefaultValue::EnumerationLiteral {
                enumeration: table.find("Kind").unwrap(),
                literal: "Instance".into(),
            }),
        ]
    );
}

#[test]
fn unsupported_argument_defaults_are_rejected() {
    let parsed = model(vec![
        kind(),
        Symbol::Class(
            Class::concrete("Something").with_method(
                Method::new("configure")
                    .with_argument(
                        Argument::new("kind", TypeAnnotation::atomic("Kind"))
                            .with_default(Expr::attribute(name("Kind"), "Nope", 0..0)),
                    )
                    .with_argument(
                        Argument::new("size", TypeAnnotation::atomic("int"))
                            .with_default(Expr::opaque("compute()", 0..0)),
                    ),
            ),
        ),
    ]);
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "The default value refers to the literal Nope, but it is not defined \
             in the enumeration Kind",
            "The translation of the default value to the intermediate layer \
             has not been implemented: compute()",
        ]
    );
}

#[test]
fn superset_resolves_to_the_subset() {
    let parsed = model(vec![
        Symbol::Enumeration(Enumeration::new("Small").with_literal("A", "a")),
        Symbol::Enumeration(
            Enumeration::new("Big")
                .with_literal("A", "a")
                .with_literal("B", "b")
                .with_superset_of("Small"),
        ),
    ]);
    let table = translate_cleanly(&parsed);

    assert_eq!(
        table.find_enumeration("Big").unwrap().is_superset_of,
        vec![table.find("Small").unwrap()]
    );
}

#[test]
fn superset_must_contain_the_literals_of_the_subset() {
    let parsed = model(vec![
        Symbol::Class(Class::concrete("Something")),
        Symbol::Enumeration(
            Enumeration::new("Small")
                .with_literal("A", "a")
                .with_literal("C", "c"),
        ),
        Symbol::Enumeration(
            Enumeration::new("Big")
                .with_literal("A", "other")
                .with_superset_of("Small")
                .with_superset_of("Something"),
        ),
    ]);
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "An element, Something, of ``is_superset_of`` is not an Enumeration",
        ]
    );

    let parsed = model(vec![
        Symbol::Enumeration(
            Enumeration::new("Small")
                .with_literal("A", "a")
                .with_literal("C", "c"),
        ),
        Symbol::Enumeration(
            Enumeration::new("Big")
                .with_literal("A", "other")
                .with_superset_of("Small"),
        ),
    ]);
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "The value 'a' of the literal A from the subset enumeration Small does not \
             equal the value 'other' of the literal A in the enumeration Big",
            "The literal C from the subset enumeration Small is missing in the enumeration Big",
        ]
    );
}

#[test]
fn association_symbol_must_be_a_class() {
    let not_a_class = SymbolTable::new(
        vec![Symbol::Enumeration(Enumeration::new(ASSOCIATION))],
        ASSOCIATION,
    )
    .unwrap();
    assert_eq!(
        leaf_messages(&translate_model(&not_a_class)),
        vec![
            "Expected the symbol representing the association references, Reference, \
             to be a class, but it is not"
        ]
    );

    let undefined = SymbolTable::new(vec![Symbol::Class(Class::concrete("Something"))], ASSOCIATION)
        .unwrap();
    assert_eq!(
        leaf_messages(&translate_model(&undefined)),
        vec!["The symbol with identifier 'Reference' is not available in the symbol table."]
    );
}

#[test]
fn association_symbol_is_resolved() {
    let table = translate_cleanly(&classes(vec![]));
    assert_eq!(table.ref_association(), table.find(ASSOCIATION).unwrap());
}

#[test]
fn self_type_is_only_allowed_for_the_instance_argument() {
    let parsed = classes(vec![
        Class::concrete("Something")
            .with_property(Property::new("me", TypeAnnotation::self_type()))
            .with_method(Method::new("copy").with_returns(TypeAnnotation::self_type())),
    ]);
    let outcome = translate_model(&parsed);

    assert_eq!(
        leaf_messages(&outcome),
        vec![
            "The type annotation ``Self`` is only expected for the instance argument \
             of a method or a constructor";
            2
        ]
    );

    let table = translate_cleanly(&classes(vec![
        Class::concrete("Something").with_method(
            Method::new("length").with_returns(TypeAnnotation::atomic("int")),
        ),
    ]));
    let method = table.find_class("Something").unwrap().method("length").unwrap();
    assert!(method.arguments.is_empty());
    assert_eq!(
        method.returns,
        Some(ir::TypeAnnotation::Primitive(PrimitiveType::Int))
    );
}
