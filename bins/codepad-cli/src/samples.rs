// Sample programs used by `smoke` to check each language end to end

use codepad_common::types::Language;

pub struct Sample {
    pub language: Language,
    pub code: &'static str,
    /// First line the program prints
    pub expected_first_line: &'static str,
}

pub const SAMPLES: &[Sample] = &[
    Sample {
        language: Language::Javascript,
        code: r#"console.log("Hello from JavaScript!");
const sum = (a, b) => a + b;
console.log("Sum of 5 and 3:", sum(5, 3));"#,
        expected_first_line: "Hello from JavaScript!",
    },
    Sample {
        language: Language::Python,
        code: r#"print("Hello from Python!")
def fibonacci(n):
    if n <= 1:
        return n
    return fibonacci(n-1) + fibonacci(n-2)
print("Fibonacci of 5:", fibonacci(5))"#,
        expected_first_line: "Hello from Python!",
    },
    Sample {
        language: Language::Java,
        code: r#"public class Main {
    public static void main(String[] args) {
        System.out.println("Hello from Java!");
        int sum = 0;
        for (int i = 1; i <= 5; i++) {
            sum += i;
        }
        System.out.println("Sum of first 5 numbers: " + sum);
    }
}"#,
        expected_first_line: "Hello from Java!",
    },
    Sample {
        language: Language::Cpp,
        code: r#"#include <iostream>
using namespace std;
int main() {
    cout << "Hello from C++!" << endl;
    int factorial = 1;
    for (int i = 1; i <= 5; i++) {
        factorial *= i;
    }
    cout << "Factorial of 5: " << factorial << endl;
    return 0;
}"#,
        expected_first_line: "Hello from C++!",
    },
];

pub fn sample_for(language: Language) -> Option<&'static Sample> {
    SAMPLES.iter().find(|s| s.language == language)
}
