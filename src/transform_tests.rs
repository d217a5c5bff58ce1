//! End-to-end fixtures: transform output compared with the printed form of
//! the expected source.

use pretty_assertions::assert_eq;

use crate::{
    config::{Config, PreserveRealExports},
    test_utils::{normalize, transform_with},
};

fn check_with(config: &Config, input: &str, expected: &str) {
    assert_eq!(transform_with(config, input), normalize(expected));
}

fn check(input: &str, expected: &str) {
    check_with(&Config::default(), input, expected);
}

#[test]
fn default_and_named_imports_from_two_modules() {
    check(
        r#"
        import A from "./a";
        import { B } from "./b";
        jest.mockObj(A);
        jest.mockObj(B);
        test("x", () => {});
        "#,
        r#"
        jest.mock("./a", () => {
            const mockedModule = { __esModule: true, default: "A" };
            return mockedModule;
        });
        jest.mock("./b", () => {
            const mockedModule = { __esModule: true, B: "B" };
            return mockedModule;
        });
        import A from "./a";
        import { B } from "./b";
        test("x", () => {});
        "#,
    );
}

#[test]
fn namespace_requests_share_one_factory() {
    check(
        r#"
        import * as C from "./c";
        jest.mockObj(C.X);
        jest.mockObj(C.Y.z);
        "#,
        r#"
        jest.mock("./c", () => {
            const mockedModule = { __esModule: true, X: "X", Y: { z: "z" } };
            return mockedModule;
        });
        import * as C from "./c";
        "#,
    );
}

#[test]
fn explicit_mock_suppresses_before_and_after() {
    let expected = r#"
        jest.mock("./b", () => {
            const mockedModule = { __esModule: true, default: "B" };
            return mockedModule;
        });
        import A from "./a";
        import B from "./b";
        jest.mock("./a");
        "#;
    check(
        r#"
        import A from "./a";
        import B from "./b";
        jest.mockObj(A, B);
        jest.mock("./a");
        "#,
        expected,
    );
    check(
        r#"
        import A from "./a";
        import B from "./b";
        jest.mock("./a");
        jest.mockObj(A, B);
        "#,
        expected,
    );
}

#[test]
fn suppressed_module_with_only_requests_emits_nothing() {
    check(
        r#"
        import A from "./a";
        jest.mockObj(A);
        jest.mockFn(A.run);
        jest.doMock("./a", () => ({}));
        "#,
        r#"
        import A from "./a";
        jest.doMock("./a", () => ({}));
        "#,
    );
}

#[test]
fn last_write_wins() {
    check(
        r#"
        import { cfg } from "./cfg";
        jest.mockObj(cfg, 1);
        jest.mockObj(cfg, 2);
        jest.mockObj(cfg, { level: 3 });
        "#,
        r#"
        jest.mock("./cfg", () => {
            const mockedModule = { __esModule: true, cfg: { level: 3 } };
            return mockedModule;
        });
        import { cfg } from "./cfg";
        "#,
    );
}

#[test]
fn flat_overwrite_discards_sub_keys() {
    check(
        r#"
        import X from "./x";
        jest.mockObj(X.b1, "v1");
        jest.mockObj(X.b2, "v2");
        jest.mockObj(X, "v3");
        "#,
        r#"
        jest.mock("./x", () => {
            const mockedModule = { __esModule: true, default: "v3" };
            return mockedModule;
        });
        import X from "./x";
        "#,
    );
}

#[test]
fn sub_keys_merge_with_own_last_write() {
    check(
        r#"
        import * as NS from "./ns";
        jest.mockObj(NS.A.b1, "v1");
        jest.mockObj(NS.A.b2, "v2");
        jest.mockObj(NS.A.b1, "v1b");
        "#,
        r#"
        jest.mock("./ns", () => {
            const mockedModule = { __esModule: true, A: { b1: "v1b", b2: "v2" } };
            return mockedModule;
        });
        import * as NS from "./ns";
        "#,
    );
}

#[test]
fn too_deep_paths_are_dropped_but_calls_removed() {
    check(
        r#"
        import D from "./d";
        import * as N from "./n";
        jest.mockObj(D.a.b);
        jest.mockObj(N.a.b.c);
        jest.mockObj(N);
        "#,
        r#"
        import D from "./d";
        import * as N from "./n";
        "#,
    );
}

#[test]
fn unknown_roots_are_dropped() {
    check(
        r#"
        import A from "./a";
        const local = {};
        jest.mockObj(local.x, window.fetch);
        "#,
        r#"
        import A from "./a";
        const local = {};
        "#,
    );
}

#[test]
fn function_mocks_are_named_at_their_location() {
    check(
        r#"
        import Api, { helpers } from "./api";
        jest.mockFn(Api, helpers.parse);
        "#,
        r#"
        jest.mock("./api", () => {
            const mockedModule = {
                __esModule: true,
                default: jest.fn(),
                helpers: { parse: jest.fn() },
            };
            mockedModule.default.mockName("Api");
            mockedModule.helpers.parse.mockName("helpers.parse");
            return mockedModule;
        });
        import Api, { helpers } from "./api";
        "#,
    );
}

#[test]
fn overwritten_function_mock_leaves_no_naming_statement() {
    check(
        r#"
        import { fetchUser } from "./users";
        jest.mockFn(fetchUser);
        jest.mockObj(fetchUser, () => Promise.resolve(null));
        "#,
        r#"
        jest.mock("./users", () => {
            const mockedModule = { __esModule: true, fetchUser: () => Promise.resolve(null) };
            return mockedModule;
        });
        import { fetchUser } from "./users";
        "#,
    );
}

#[test]
fn name_mock_uses_last_segment() {
    check(
        r#"
        import * as icons from "./icons";
        jest.mockObj(icons.Foo);
        "#,
        r#"
        jest.mock("./icons", () => {
            const mockedModule = { __esModule: true, Foo: "Foo" };
            return mockedModule;
        });
        import * as icons from "./icons";
        "#,
    );
}

#[test]
fn registrations_follow_first_import_order_after_directives() {
    check(
        r#"
        "use strict";
        import { z } from "./z";
        import a from "./a";
        import { y } from "./z";
        jest.mockObj(a, y, z);
        "#,
        r#"
        "use strict";
        jest.mock("./z", () => {
            const mockedModule = { __esModule: true, z: "z", y: "y" };
            return mockedModule;
        });
        jest.mock("./a", () => {
            const mockedModule = { __esModule: true, default: "a" };
            return mockedModule;
        });
        import { z } from "./z";
        import a from "./a";
        import { y } from "./z";
        "#,
    );
}

#[test]
fn preserve_real_exports_everywhere() {
    let config = Config { preserve_real_exports: PreserveRealExports::Always, ..Config::default() };
    check_with(
        &config,
        r#"
        import React from "react";
        import * as router from "react-router";
        jest.mockObj(React.useState, () => [null, jest.fn()]);
        jest.mockObj(router.useParams);
        "#,
        r#"
        jest.mock("react", () => {
            const mockedModule = {
                ...jest.requireActual("react"),
                __esModule: true,
                default: { ...jest.requireActual("react").default, useState: () => [null, jest.fn()] },
            };
            return mockedModule;
        });
        jest.mock("react-router", () => {
            const mockedModule = {
                ...jest.requireActual("react-router"),
                __esModule: true,
                useParams: "useParams",
            };
            return mockedModule;
        });
        import React from "react";
        import * as router from "react-router";
        "#,
    );
}

#[test]
fn preserve_real_exports_for_nested_only() {
    let config = Config { preserve_real_exports: PreserveRealExports::Nested, ..Config::default() };
    check_with(
        &config,
        r#"
        import React from "react";
        import * as router from "react-router";
        jest.mockObj(React.useState);
        jest.mockObj(router.useParams);
        "#,
        r#"
        jest.mock("react", () => {
            const mockedModule = {
                ...jest.requireActual("react"),
                __esModule: true,
                default: { ...jest.requireActual("react").default, useState: "useState" },
            };
            return mockedModule;
        });
        jest.mock("react-router", () => {
            const mockedModule = { __esModule: true, useParams: "useParams" };
            return mockedModule;
        });
        import React from "react";
        import * as router from "react-router";
        "#,
    );
}

#[test]
fn custom_identifiers_and_global() {
    let config = Config::from_json(
        r#"{
            "globalMockIdentifier": "vi",
            "requestIdentifiers": [
                { "name": "mocks.value", "kind": "nameMock" },
                { "name": "mocks.spy", "kind": "functionMock" }
            ]
        }"#,
    )
    .unwrap();
    check_with(
        &config,
        r#"
        import { a, b } from "./m";
        mocks.value(a);
        mocks.spy(b);
        jest.mockObj(a);
        "#,
        r#"
        vi.mock("./m", () => {
            const mockedModule = { __esModule: true, a: "a", b: vi.fn() };
            mockedModule.b.mockName("b");
            return mockedModule;
        });
        import { a, b } from "./m";
        jest.mockObj(a);
        "#,
    );
}

#[test]
fn no_requests_no_changes() {
    let code = r#"
        import A from "./a";
        import * as B from "./b";
        jest.mock("./a");
        const x = A(B.y);
        it("runs", () => expect(x).toBe(1));
        "#;
    check(code, code);
}

#[test]
fn requests_inside_replacement_values_are_handled() {
    check(
        r#"
        import A from "./a";
        import B from "./b";
        jest.mockObj(A, () => jest.mockFn(B));
        "#,
        r#"
        jest.mock("./a", () => {
            const mockedModule = { __esModule: true, default: () => void 0 };
            return mockedModule;
        });
        jest.mock("./b", () => {
            const mockedModule = { __esModule: true, default: jest.fn() };
            mockedModule.default.mockName("B");
            return mockedModule;
        });
        import A from "./a";
        import B from "./b";
        "#,
    );
}

#[test]
fn explicit_mock_inside_replacement_value_suppresses() {
    check(
        r#"
        import A from "./a";
        import B from "./b";
        jest.mockObj(B, jest.mock("./a"));
        jest.mockObj(A);
        "#,
        r#"
        jest.mock("./b", () => {
            const mockedModule = { __esModule: true, default: jest.mock("./a") };
            return mockedModule;
        });
        import A from "./a";
        import B from "./b";
        "#,
    );
}

#[test]
fn template_literal_explicit_mock_suppresses() {
    check(
        r#"
        import A from "./a";
        jest.mockObj(A);
        jest.mock(`./a`);
        "#,
        r#"
        import A from "./a";
        jest.mock(`./a`);
        "#,
    );
}

#[test]
fn parenthesized_request_statement_is_removed() {
    check(
        r#"
        import A from "./a";
        (jest.mockObj(A));
        "#,
        r#"
        jest.mock("./a", () => {
            const mockedModule = { __esModule: true, default: "A" };
            return mockedModule;
        });
        import A from "./a";
        "#,
    );
}
