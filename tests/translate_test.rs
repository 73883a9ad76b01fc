// End-to-end translation tests covering all three directions.

use xlate::ast::{AstNode, BinOp, Ctor, Field, Method, Param, Program};
use xlate::error::TranslateError;
use xlate::gen::c::CGen;
use xlate::gen::GenMode;
use xlate::{c_to_cpp, c_to_java, java_to_c};

#[test]
fn test_c_to_java_full_program() {
    let source = r#"
        #define LIMIT 10

        int square(int n) {
            return n * n;
        }

        int main() {
            int total = 0;
            for (int i = 0; i < LIMIT; i++) {
                total += square(i);
            }
            printf("total=%d\n", total);
            return 0;
        }
    "#;

    let out = c_to_java(source, GenMode::Strict).expect("translation failed");

    assert!(out.contains("public class Main {"));
    assert!(out.contains("static final int LIMIT = 10;"));
    assert!(out.contains("public static int square(int n) {"));
    assert!(out.contains("return n * n;"));
    assert!(out.contains("public static void main(String[] args) {"));
    assert!(out.contains("for (int i = 0; i < LIMIT; i++) {"));
    assert!(out.contains("total += square(i);"));
    assert!(out.contains(r#"System.out.printf("total=%d%n", total);"#));
    // return 0 in the entry point drops the value
    assert!(out.contains("        return;"));
}

#[test]
fn test_c_to_java_io_lowering() {
    let source = r#"
        int main() {
            int age;
            printf("Enter age: ");
            scanf("%d", &age);
            printf("%d\n", age);
            printf("done\n");
            return 0;
        }
    "#;

    let out = c_to_java(source, GenMode::Strict).expect("translation failed");

    assert!(out.contains("import java.util.Scanner;"));
    assert!(out.contains("Scanner sc = new Scanner(System.in);"));
    assert!(out.contains(r#"System.out.print("Enter age: ");"#));
    assert!(out.contains("age = sc.nextInt();"));
    assert!(out.contains("System.out.println(age);"));
    assert!(out.contains(r#"System.out.println("done");"#));
}

#[test]
fn test_c_to_cpp_full_program() {
    let source = r#"
        int main() {
            int a;
            int b;
            scanf("%d %d", &a, &b);
            printf("sum=%d\n", a + b);
            return 0;
        }
    "#;

    let out = c_to_cpp(source, GenMode::Strict).expect("translation failed");

    assert!(out.contains("#include <iostream>"));
    assert!(out.contains("using namespace std;"));
    assert!(out.contains("int main(int argc, char* argv[]) {"));
    assert!(out.contains("cin >> a >> b;"));
    assert!(out.contains(r#"cout << "sum=" << a + b << endl;"#));
}

#[test]
fn test_java_to_c_full_program() {
    let source = r#"
        public class Main {
            public static int doubled(int n) {
                return n * 2;
            }

            public static void main(String[] args) {
                int x = doubled(21);
                System.out.println(x);
            }
        }
    "#;

    let out = java_to_c(source, GenMode::Strict).expect("translation failed");

    assert!(out.contains("#include <stdio.h>"));
    assert!(out.contains("#include <stdlib.h>"));
    assert!(out.contains("int doubled(int n);"));
    assert!(out.contains("int doubled(int n) {"));
    assert!(out.contains("int main() {"));
    assert!(out.contains("int x = doubled(21);"));
    assert!(out.contains(r#"printf("%d\n", x);"#));
    assert!(out.contains("return 0;"));
}

#[test]
fn test_java_to_c_hashmap_program() {
    let source = r#"
        public class Main {
            public static void main(String[] args) {
                HashMap<Integer, Integer> ages = new HashMap<>();
                HashMap<Integer, Integer> scores = new HashMap<>();
                ages.put(1, 30);
                ages.put(1, 31);
                scores.put(2, 95);
                if (ages.containsKey(1)) {
                    System.out.println(ages.get(1));
                }
            }
        }
    "#;

    let out = java_to_c(source, GenMode::Strict).expect("translation failed");

    // the runtime is emitted once no matter how many maps exist
    assert_eq!(out.matches("#define HASHMAP_SIZE 100").count(), 1);
    assert_eq!(out.matches("HashMap hashmap_create()").count(), 1);
    assert!(out.contains("HashMap ages = hashmap_create();"));
    assert!(out.contains("HashMap scores = hashmap_create();"));
    assert!(out.contains("hashmap_put(&ages, 1, 30);"));
    assert!(out.contains("hashmap_put(&ages, 1, 31);"));
    assert!(out.contains("if (hashmap_contains(&ages, 1)) {"));
    assert!(out.contains(r#"printf("%d\n", hashmap_get(&ages, 1));"#));

    // put updates an existing key before trying to append
    let update = out.find("m->values[i] = value;").expect("update branch");
    let append = out.find("m->keys[m->size] = key;").expect("append branch");
    assert!(update < append);
}

#[test]
fn test_2d_array_generation() {
    let source = r#"
        int main() {
            int m[3][3];
            for (int i = 0; i < 3; i++) {
                for (int j = 0; j < 3; j++) {
                    m[i][j] = i + j;
                }
            }
            printf("%d\n", m[1][2]);
            return 0;
        }
    "#;

    let java = c_to_java(source, GenMode::Strict).expect("Java translation failed");
    assert!(java.contains("int[][] m = new int[3][3];"));
    assert!(java.contains("m[i][j] = i + j;"));
    assert!(java.contains("System.out.println(m[1][2]);"));

    let cpp = c_to_cpp(source, GenMode::Strict).expect("C++ translation failed");
    assert!(cpp.contains("int m[3][3];"));
    assert!(cpp.contains("m[i][j] = i + j;"));

    let java_source = r#"
        public class Main {
            public static void main(String[] args) {
                int[][] m = new int[3][3];
                m[1][2] = 5;
                System.out.println(m[1][2]);
            }
        }
    "#;

    let c = java_to_c(java_source, GenMode::Strict).expect("C translation failed");
    assert!(c.contains("int m[3][3];"));
    assert!(c.contains("m[1][2] = 5;"));
    assert!(c.contains(r#"printf("%d\n", m[1][2]);"#));
}

#[test]
fn test_control_flow_round_trips_structurally() {
    let source = r#"
        int main() {
            int n = 7;
            if (n % 2 == 0) {
                printf("even\n");
            } else if (n < 0) {
                printf("negative\n");
            } else {
                printf("odd\n");
            }
            switch (n) {
                case 7:
                    printf("seven\n");
                    break;
                default:
                    printf("other\n");
            }
            do {
                n--;
            } while (n > 0);
            return 0;
        }
    "#;

    let java = c_to_java(source, GenMode::Strict).expect("Java translation failed");
    assert!(java.contains("} else if (n < 0) {"));
    assert!(java.contains("} else {"));
    assert!(java.contains("switch (n) {"));
    assert!(java.contains("case 7:"));
    assert!(java.contains("break;"));
    assert!(java.contains("do {"));
    assert!(java.contains("} while (n > 0);"));

    let cpp = c_to_cpp(source, GenMode::Strict).expect("C++ translation failed");
    assert!(cpp.contains("} else if (n < 0) {"));
    assert!(cpp.contains("} while (n > 0);"));
}

#[test]
fn test_library_rewrites_per_target() {
    let source = r#"
        int main() {
            int n = strlen(name);
            int r = strcmp(a, b);
            double s = sqrt(2.0);
            return 0;
        }
    "#;

    let java = c_to_java(source, GenMode::Strict).expect("Java translation failed");
    assert!(java.contains("import java.lang.Math;"));
    assert!(java.contains("int n = name.length();"));
    assert!(java.contains("int r = a.compareTo(b);"));
    assert!(java.contains("double s = Math.sqrt(2.0f);"));

    let cpp = c_to_cpp(source, GenMode::Strict).expect("C++ translation failed");
    assert!(cpp.contains("#include <cmath>"));
    assert!(cpp.contains("int n = name.length();"));
    assert!(cpp.contains("int r = a.compare(b);"));
    assert!(cpp.contains("double s = sqrt(2.0);"));
}

#[test]
fn test_class_lowering_to_c() {
    let mut program = Program::new();
    program.items.push(AstNode::ClassDecl {
        name: "Counter".to_string(),
        base: None,
        fields: vec![Field {
            ty: "int".to_string(),
            name: "count".to_string(),
        }],
        ctor: Some(Ctor {
            params: Vec::new(),
            field_inits: vec![("count".to_string(), AstNode::IntLit("0".to_string()))],
            body: Vec::new(),
        }),
        dtor: None,
        methods: vec![Method {
            return_type: "int".to_string(),
            name: "next".to_string(),
            params: Vec::new(),
            body: vec![AstNode::Return {
                value: Some(Box::new(AstNode::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(AstNode::Ident("count".to_string())),
                    rhs: Box::new(AstNode::IntLit("1".to_string())),
                })),
            }],
            is_virtual: false,
        }],
    });

    let out = CGen::new(GenMode::Strict)
        .generate(&program)
        .expect("generation failed");

    assert!(out.contains("typedef struct Counter Counter;"));
    assert!(out.contains("struct Counter {"));
    assert!(out.contains("int count;"));
    assert!(out.contains("void Counter_init(Counter* self) {"));
    assert!(out.contains("self->count = 0;"));
    assert!(out.contains("int Counter_next(Counter* self) {"));
    assert!(out.contains("return self->count + 1;"));
}

#[test]
fn test_generic_fn_macro_lowering() {
    let mut program = Program::new();
    program.items.push(AstNode::GenericFn {
        name: "square".to_string(),
        type_params: vec!["T".to_string()],
        params: vec![Param {
            ty: "T".to_string(),
            name: "x".to_string(),
            is_array: false,
        }],
        body: vec![AstNode::Return {
            value: Some(Box::new(AstNode::Binary {
                op: BinOp::Mul,
                lhs: Box::new(AstNode::Ident("x".to_string())),
                rhs: Box::new(AstNode::Ident("x".to_string())),
            })),
        }],
    });

    let out = CGen::new(GenMode::Strict)
        .generate(&program)
        .expect("generation failed");
    assert!(out.contains("#define SQUARE(x) (x * x)"));
}

#[test]
fn test_strict_rejects_what_lenient_comments_out() {
    let mut program = Program::new();
    program.items.push(AstNode::ClassDecl {
        name: "Widget".to_string(),
        base: None,
        fields: Vec::new(),
        ctor: None,
        dtor: None,
        methods: Vec::new(),
    });

    program.items.push(AstNode::Function {
        return_type: "int".to_string(),
        name: "main".to_string(),
        params: Vec::new(),
        body: vec![
            AstNode::VarDecl {
                ty: "int".to_string(),
                name: "x".to_string(),
                init: Some(Box::new(AstNode::IntLit("1".to_string()))),
            },
            AstNode::Return {
                value: Some(Box::new(AstNode::IntLit("0".to_string()))),
            },
        ],
        is_entry: true,
    });

    let err = xlate::gen::java::JavaGen::new(GenMode::Strict)
        .generate(&program)
        .unwrap_err();
    assert_eq!(err.node_kind, "ClassDecl");

    // lenient mode leaves a placeholder and translates the rest untouched
    let out = xlate::gen::java::JavaGen::new(GenMode::Lenient)
        .generate(&program)
        .expect("lenient generation failed");
    assert!(out.contains("/* unsupported: ClassDecl */"));
    assert!(out.contains("public static void main(String[] args) {"));
    assert!(out.contains("int x = 1;"));
    assert!(out.contains("        return;"));
}

#[test]
fn test_parse_error_reports_line_and_expectation() {
    let source = "int main() { int = 5; return 0; }";
    let err = c_to_java(source, GenMode::Strict).unwrap_err();
    match err {
        TranslateError::Parse(e) => {
            assert_eq!(e.line, 1);
            assert!(e.expected.contains("variable name"));
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn test_lex_error_reports_position() {
    let source = "int main() { int x = `; return 0; }";
    let err = c_to_java(source, GenMode::Strict).unwrap_err();
    match err {
        TranslateError::Lex(e) => assert_eq!(e.line, 1),
        other => panic!("expected a lex error, got {:?}", other),
    }
}
