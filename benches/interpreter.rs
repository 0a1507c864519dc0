use criterion::{Criterion, black_box, criterion_group, criterion_main};

use calcwalk::ast::{
    BinaryOperator, ComparisonOperator, Condition, Expression, Program, Statement,
};
use calcwalk::env::Environment;
use calcwalk::interpreter::Evaluator;
use calcwalk::io::{InputSource, OutputSink};

// n = iterations; sum = 0; while n > 0 { sum = sum + n; n = n - 1 }
fn accumulation_program(iterations: i64) -> Program {
    let var = |name: &str| Expression::Variable(name.to_string());
    Program {
        statements: vec![
            Statement::Assign {
                name: "n".to_string(),
                value: Expression::Constant(iterations),
            },
            Statement::Assign {
                name: "sum".to_string(),
                value: Expression::Constant(0),
            },
            Statement::While {
                condition: Condition {
                    left: var("n"),
                    op: ComparisonOperator::Greater,
                    right: Expression::Constant(0),
                },
                body: vec![
                    Statement::Assign {
                        name: "sum".to_string(),
                        value: Expression::Binary {
                            left: Box::new(var("sum")),
                            op: BinaryOperator::Add,
                            right: Box::new(var("n")),
                        },
                    },
                    Statement::Assign {
                        name: "n".to_string(),
                        value: Expression::Binary {
                            left: Box::new(var("n")),
                            op: BinaryOperator::Sub,
                            right: Box::new(Expression::Constant(1)),
                        },
                    },
                ],
            },
        ],
    }
}

fn bench_interpreter(c: &mut Criterion) {
    for iterations in [100_i64, 10_000] {
        let program = accumulation_program(iterations);

        c.bench_function(&format!("interpreter_sum_loop_{iterations}"), |b| {
            b.iter(|| {
                let mut input = InputSource::empty();
                let mut output = OutputSink::silent();
                let mut evaluator = Evaluator::new(&mut input, &mut output);
                let env = evaluator
                    .run(black_box(&program), Environment::new())
                    .expect("run");
                black_box(env);
            })
        });
    }
}

criterion_group!(benches, bench_interpreter);
criterion_main!(benches);
