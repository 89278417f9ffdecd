//! Closed set of node kinds known to the index
//!
//! Several kinds share one ESTree type name: binding identifiers, identifier
//! references and property names are all `Identifier` to selectors, but the
//! scope resolver needs to tell them apart.

/// Kind tag of a [`SyntaxNode`](super::SyntaxNode)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,

    // Identifiers
    IdentifierReference,
    BindingIdentifier,
    IdentifierName,

    // Literals
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    RegExpLiteral,
    TemplateLiteral,

    // Statements
    BlockStatement,
    ExpressionStatement,
    IfStatement,
    ReturnStatement,
    ForStatement,
    WhileStatement,

    // Declarations
    VariableDeclaration,
    VariableDeclarator,
    FunctionDeclaration,
    FunctionExpression,
    TSDeclareFunction,
    /// Block body of a function or arrow function
    FunctionBody,
    /// Expression body of a concise arrow function
    ExpressionBody,
    FormalParameters,
    FormalParameter,
    Class,

    // Expressions
    ArrowFunctionExpression,
    CallExpression,
    NewExpression,
    ObjectExpression,
    ObjectProperty,
    ArrayExpression,
    ConditionalExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    ParenthesizedExpression,
    /// Static, computed or private-field member access
    MemberExpression,
    SpreadElement,
    UnaryExpression,
    PrivateIdentifier,

    // Modules
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    ExportAllDeclaration,
    ExportSpecifier,

    // TypeScript
    TSTypeAliasDeclaration,
    TSInterfaceDeclaration,
    TSInterfaceBody,
    TSPropertySignature,
    TSTypeLiteral,
    TSTypeReference,
    TSQualifiedName,
    TSTypeAnnotation,
    TSTypeParameterInstantiation,
    TSUnionType,
    TSAsExpression,
    TSSatisfiesExpression,
    TSNonNullExpression,
    TSEnumDeclaration,
    TSAnyKeyword,
    TSUnknownKeyword,
    TSNeverKeyword,
    TSVoidKeyword,
    TSStringKeyword,
    TSNumberKeyword,
    TSBooleanKeyword,
    TSNullKeyword,
    TSUndefinedKeyword,

    // JSX
    JSXElement,
    JSXFragment,
    JSXOpeningElement,
    JSXText,
    JSXExpressionContainer,

    /// Any syntax the index does not model individually
    Unknown,
}

impl NodeKind {
    /// All kinds, in declaration order
    pub const ALL: &'static [NodeKind] = &[
        NodeKind::Program,
        NodeKind::IdentifierReference,
        NodeKind::BindingIdentifier,
        NodeKind::IdentifierName,
        NodeKind::StringLiteral,
        NodeKind::NumericLiteral,
        NodeKind::BooleanLiteral,
        NodeKind::NullLiteral,
        NodeKind::RegExpLiteral,
        NodeKind::TemplateLiteral,
        NodeKind::BlockStatement,
        NodeKind::ExpressionStatement,
        NodeKind::IfStatement,
        NodeKind::ReturnStatement,
        NodeKind::ForStatement,
        NodeKind::WhileStatement,
        NodeKind::VariableDeclaration,
        NodeKind::VariableDeclarator,
        NodeKind::FunctionDeclaration,
        NodeKind::FunctionExpression,
        NodeKind::TSDeclareFunction,
        NodeKind::FunctionBody,
        NodeKind::ExpressionBody,
        NodeKind::FormalParameters,
        NodeKind::FormalParameter,
        NodeKind::Class,
        NodeKind::ArrowFunctionExpression,
        NodeKind::CallExpression,
        NodeKind::NewExpression,
        NodeKind::ObjectExpression,
        NodeKind::ObjectProperty,
        NodeKind::ArrayExpression,
        NodeKind::ConditionalExpression,
        NodeKind::BinaryExpression,
        NodeKind::LogicalExpression,
        NodeKind::AssignmentExpression,
        NodeKind::ParenthesizedExpression,
        NodeKind::MemberExpression,
        NodeKind::SpreadElement,
        NodeKind::UnaryExpression,
        NodeKind::PrivateIdentifier,
        NodeKind::ImportDeclaration,
        NodeKind::ImportSpecifier,
        NodeKind::ImportDefaultSpecifier,
        NodeKind::ImportNamespaceSpecifier,
        NodeKind::ExportNamedDeclaration,
        NodeKind::ExportDefaultDeclaration,
        NodeKind::ExportAllDeclaration,
        NodeKind::ExportSpecifier,
        NodeKind::TSTypeAliasDeclaration,
        NodeKind::TSInterfaceDeclaration,
        NodeKind::TSInterfaceBody,
        NodeKind::TSPropertySignature,
        NodeKind::TSTypeLiteral,
        NodeKind::TSTypeReference,
        NodeKind::TSQualifiedName,
        NodeKind::TSTypeAnnotation,
        NodeKind::TSTypeParameterInstantiation,
        NodeKind::TSUnionType,
        NodeKind::TSAsExpression,
        NodeKind::TSSatisfiesExpression,
        NodeKind::TSNonNullExpression,
        NodeKind::TSEnumDeclaration,
        NodeKind::TSAnyKeyword,
        NodeKind::TSUnknownKeyword,
        NodeKind::TSNeverKeyword,
        NodeKind::TSVoidKeyword,
        NodeKind::TSStringKeyword,
        NodeKind::TSNumberKeyword,
        NodeKind::TSBooleanKeyword,
        NodeKind::TSNullKeyword,
        NodeKind::TSUndefinedKeyword,
        NodeKind::JSXElement,
        NodeKind::JSXFragment,
        NodeKind::JSXOpeningElement,
        NodeKind::JSXText,
        NodeKind::JSXExpressionContainer,
        NodeKind::Unknown,
    ];

    /// ESTree type name, as written in selectors
    pub fn type_name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::IdentifierReference
            | NodeKind::BindingIdentifier
            | NodeKind::IdentifierName => "Identifier",
            NodeKind::StringLiteral
            | NodeKind::NumericLiteral
            | NodeKind::BooleanLiteral
            | NodeKind::NullLiteral
            | NodeKind::RegExpLiteral => "Literal",
            NodeKind::TemplateLiteral => "TemplateLiteral",
            NodeKind::BlockStatement | NodeKind::FunctionBody => "BlockStatement",
            NodeKind::ExpressionBody => "ExpressionBody",
            NodeKind::ExpressionStatement => "ExpressionStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ReturnStatement => "ReturnStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::VariableDeclarator => "VariableDeclarator",
            NodeKind::FunctionDeclaration => "FunctionDeclaration",
            NodeKind::FunctionExpression => "FunctionExpression",
            NodeKind::TSDeclareFunction => "TSDeclareFunction",
            NodeKind::FormalParameters => "FormalParameters",
            NodeKind::FormalParameter => "FormalParameter",
            NodeKind::Class => "Class",
            NodeKind::ArrowFunctionExpression => "ArrowFunctionExpression",
            NodeKind::CallExpression => "CallExpression",
            NodeKind::NewExpression => "NewExpression",
            NodeKind::ObjectExpression => "ObjectExpression",
            NodeKind::ObjectProperty => "Property",
            NodeKind::ArrayExpression => "ArrayExpression",
            NodeKind::ConditionalExpression => "ConditionalExpression",
            NodeKind::BinaryExpression => "BinaryExpression",
            NodeKind::LogicalExpression => "LogicalExpression",
            NodeKind::AssignmentExpression => "AssignmentExpression",
            NodeKind::ParenthesizedExpression => "ParenthesizedExpression",
            NodeKind::MemberExpression => "MemberExpression",
            NodeKind::SpreadElement => "SpreadElement",
            NodeKind::UnaryExpression => "UnaryExpression",
            NodeKind::PrivateIdentifier => "PrivateIdentifier",
            NodeKind::ImportDeclaration => "ImportDeclaration",
            NodeKind::ImportSpecifier => "ImportSpecifier",
            NodeKind::ImportDefaultSpecifier => "ImportDefaultSpecifier",
            NodeKind::ImportNamespaceSpecifier => "ImportNamespaceSpecifier",
            NodeKind::ExportNamedDeclaration => "ExportNamedDeclaration",
            NodeKind::ExportDefaultDeclaration => "ExportDefaultDeclaration",
            NodeKind::ExportAllDeclaration => "ExportAllDeclaration",
            NodeKind::ExportSpecifier => "ExportSpecifier",
            NodeKind::TSTypeAliasDeclaration => "TSTypeAliasDeclaration",
            NodeKind::TSInterfaceDeclaration => "TSInterfaceDeclaration",
            NodeKind::TSInterfaceBody => "TSInterfaceBody",
            NodeKind::TSPropertySignature => "TSPropertySignature",
            NodeKind::TSTypeLiteral => "TSTypeLiteral",
            NodeKind::TSTypeReference => "TSTypeReference",
            NodeKind::TSQualifiedName => "TSQualifiedName",
            NodeKind::TSTypeAnnotation => "TSTypeAnnotation",
            NodeKind::TSTypeParameterInstantiation => "TSTypeParameterInstantiation",
            NodeKind::TSUnionType => "TSUnionType",
            NodeKind::TSAsExpression => "TSAsExpression",
            NodeKind::TSSatisfiesExpression => "TSSatisfiesExpression",
            NodeKind::TSNonNullExpression => "TSNonNullExpression",
            NodeKind::TSEnumDeclaration => "TSEnumDeclaration",
            NodeKind::TSAnyKeyword => "TSAnyKeyword",
            NodeKind::TSUnknownKeyword => "TSUnknownKeyword",
            NodeKind::TSNeverKeyword => "TSNeverKeyword",
            NodeKind::TSVoidKeyword => "TSVoidKeyword",
            NodeKind::TSStringKeyword => "TSStringKeyword",
            NodeKind::TSNumberKeyword => "TSNumberKeyword",
            NodeKind::TSBooleanKeyword => "TSBooleanKeyword",
            NodeKind::TSNullKeyword => "TSNullKeyword",
            NodeKind::TSUndefinedKeyword => "TSUndefinedKeyword",
            NodeKind::JSXElement => "JSXElement",
            NodeKind::JSXFragment => "JSXFragment",
            NodeKind::JSXOpeningElement => "JSXOpeningElement",
            NodeKind::JSXText => "JSXText",
            NodeKind::JSXExpressionContainer => "JSXExpressionContainer",
            NodeKind::Unknown => "Unknown",
        }
    }

    /// Check if any kind carries the given ESTree type name
    pub fn is_known_type_name(name: &str) -> bool {
        Self::ALL.iter().any(|kind| kind.type_name() == name)
    }

    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            NodeKind::IdentifierReference | NodeKind::BindingIdentifier | NodeKind::IdentifierName
        )
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral
                | NodeKind::NumericLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::NullLiteral
                | NodeKind::RegExpLiteral
        )
    }

    /// Function-like nodes: anything that opens a parameter list
    pub fn is_function(self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDeclaration
                | NodeKind::FunctionExpression
                | NodeKind::TSDeclareFunction
                | NodeKind::ArrowFunctionExpression
        )
    }

    /// Declarations that introduce a single named binding
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            NodeKind::VariableDeclarator
                | NodeKind::FunctionDeclaration
                | NodeKind::TSDeclareFunction
                | NodeKind::Class
                | NodeKind::FormalParameter
                | NodeKind::TSTypeAliasDeclaration
                | NodeKind::TSInterfaceDeclaration
                | NodeKind::TSEnumDeclaration
                | NodeKind::ImportSpecifier
                | NodeKind::ImportDefaultSpecifier
                | NodeKind::ImportNamespaceSpecifier
        )
    }

    /// Nodes whose children are a statement list
    pub fn is_statement_container(self) -> bool {
        matches!(
            self,
            NodeKind::Program | NodeKind::BlockStatement | NodeKind::FunctionBody
        )
    }

    pub fn is_export(self) -> bool {
        matches!(
            self,
            NodeKind::ExportNamedDeclaration
                | NodeKind::ExportDefaultDeclaration
                | NodeKind::ExportAllDeclaration
        )
    }

    pub fn is_import_specifier(self) -> bool {
        matches!(
            self,
            NodeKind::ImportSpecifier
                | NodeKind::ImportDefaultSpecifier
                | NodeKind::ImportNamespaceSpecifier
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_type_names() {
        assert_eq!(NodeKind::BindingIdentifier.type_name(), "Identifier");
        assert_eq!(NodeKind::IdentifierReference.type_name(), "Identifier");
        assert_eq!(NodeKind::FunctionBody.type_name(), "BlockStatement");
        assert_eq!(NodeKind::ObjectProperty.type_name(), "Property");
    }

    #[test]
    fn test_known_type_names() {
        assert!(NodeKind::is_known_type_name("FunctionDeclaration"));
        assert!(NodeKind::is_known_type_name("Literal"));
        assert!(NodeKind::is_known_type_name("MemberExpression"));
        assert!(NodeKind::is_known_type_name("TSStringKeyword"));
        assert!(!NodeKind::is_known_type_name("FunctionDeclarationn"));
    }

    #[test]
    fn test_all_is_complete() {
        assert_eq!(NodeKind::ALL.len(), 78);
        assert_eq!(NodeKind::ALL.last(), Some(&NodeKind::Unknown));
    }
}
