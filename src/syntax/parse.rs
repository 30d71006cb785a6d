//! Script parsing via swc.
//!
//! Parses JavaScript source twice over the same input: once with the bare
//! lexer to collect token spans for the [`TokenStream`], once with the parser
//! for the AST, which is then lowered into the homogeneous [`SyntaxTree`].

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceMap, Span, Spanned, sync::Lrc};
use swc_ecma_ast as ast;
use swc_ecma_parser::{Parser, StringInput, Syntax, lexer::Lexer};

use super::tokens::TokenStream;
use super::tree::{NodeId, NodeKind, SyntaxTree, TreeBuilder};

/// A parsed script unit: token stream plus lowered syntax tree.
#[derive(Debug)]
pub struct ScriptParse {
    pub tokens: TokenStream,
    pub tree: SyntaxTree,
}

/// Parse JavaScript source into a [`ScriptParse`].
///
/// Both classic scripts and ES modules are accepted. Returns an error when
/// swc cannot parse the source; the caller excludes such units from further
/// processing.
pub fn parse_script_source(source: &str, file_label: &str) -> Result<ScriptParse> {
    GLOBALS.set(&Globals::new(), || {
        let source_map: Lrc<SourceMap> = Default::default();
        let source_file = source_map
            .new_source_file(FileName::Real(file_label.into()).into(), source.to_string());
        let base = source_file.start_pos.0;

        let syntax = Syntax::Es(Default::default());

        // First pass: raw token spans.
        let lexer = Lexer::new(
            syntax,
            Default::default(),
            StringInput::from(&*source_file),
            None,
        );
        let mut spans = Vec::new();
        for token in lexer {
            let span = token.span;
            spans.push((
                span.lo.0.saturating_sub(base) as usize,
                span.hi.0.saturating_sub(base) as usize,
            ));
        }
        let tokens = TokenStream::new(source, &spans);

        // Second pass: the AST.
        let lexer = Lexer::new(
            syntax,
            Default::default(),
            StringInput::from(&*source_file),
            None,
        );
        let mut parser = Parser::new_from(lexer);
        let program = parser
            .parse_program()
            .map_err(|e| anyhow!("failed to parse {}: {:?}", file_label, e))?;

        let tree = Lowering::new(&tokens, base).lower(&program);
        Ok(ScriptParse { tokens, tree })
    })
}

/// Lowers the typed swc AST into the walker's homogeneous tree.
///
/// Only constructs that can contain localizable text (or that identifier
/// collection cares about) become children; everything else is left to the
/// verbatim token copy of the rewrite pass. Import/export sources and
/// non-computed property keys are deliberately opaque so their string
/// literals are never offered for extraction.
struct Lowering<'a> {
    tokens: &'a TokenStream,
    base: u32,
    builder: TreeBuilder,
}

impl<'a> Lowering<'a> {
    fn new(tokens: &'a TokenStream, base: u32) -> Self {
        Self {
            tokens,
            base,
            builder: TreeBuilder::default(),
        }
    }

    fn lower(mut self, program: &ast::Program) -> SyntaxTree {
        let root = match program {
            ast::Program::Script(script) => {
                let children = script.body.iter().map(|s| self.stmt(s)).collect();
                self.node(NodeKind::Other, None, script.span, children)
            }
            ast::Program::Module(module) => {
                let children = module.body.iter().map(|i| self.module_item(i)).collect();
                self.node(NodeKind::Other, None, module.span, children)
            }
        };
        self.builder.finish(root)
    }

    fn node(
        &mut self,
        kind: NodeKind,
        text: Option<String>,
        span: Span,
        children: Vec<NodeId>,
    ) -> NodeId {
        let lo = (span.lo.0.saturating_sub(self.base)) as usize;
        let hi = (span.hi.0.saturating_sub(self.base)) as usize;
        let (start, stop) = self.tokens.bounds(lo, hi);
        self.builder.push(kind, text, children, start, stop)
    }

    fn opaque(&mut self, span: Span) -> NodeId {
        self.node(NodeKind::Other, None, span, vec![])
    }

    fn ident(&mut self, ident: &ast::Ident) -> NodeId {
        self.node(
            NodeKind::Ident,
            Some(ident.sym.to_string()),
            ident.span,
            vec![],
        )
    }

    // ------------------------------------------------------------
    // Module level
    // ------------------------------------------------------------

    fn module_item(&mut self, item: &ast::ModuleItem) -> NodeId {
        match item {
            ast::ModuleItem::Stmt(stmt) => self.stmt(stmt),
            ast::ModuleItem::ModuleDecl(decl) => self.module_decl(decl),
        }
    }

    fn module_decl(&mut self, decl: &ast::ModuleDecl) -> NodeId {
        match decl {
            ast::ModuleDecl::ExportDecl(e) => {
                let child = self.decl(&e.decl);
                self.node(NodeKind::Other, None, e.span, vec![child])
            }
            ast::ModuleDecl::ExportDefaultDecl(e) => {
                let child = match &e.decl {
                    ast::DefaultDecl::Fn(f) => self.fn_expr(f, f.span()),
                    ast::DefaultDecl::Class(c) => {
                        self.class_node(c.ident.as_ref(), &c.class, c.span())
                    }
                    ast::DefaultDecl::TsInterfaceDecl(i) => self.opaque(i.span()),
                };
                self.node(NodeKind::Other, None, e.span, vec![child])
            }
            ast::ModuleDecl::ExportDefaultExpr(e) => {
                let child = self.expr(&e.expr);
                self.node(NodeKind::Other, None, e.span, vec![child])
            }
            // Import and re-export sources are module plumbing, not text.
            other => self.opaque(other.span()),
        }
    }

    // ------------------------------------------------------------
    // Statements and declarations
    // ------------------------------------------------------------

    fn stmt(&mut self, stmt: &ast::Stmt) -> NodeId {
        match stmt {
            ast::Stmt::Block(b) => self.block(b),
            ast::Stmt::With(w) => {
                let children = vec![self.expr(&w.obj), self.stmt(&w.body)];
                self.node(NodeKind::Other, None, w.span, children)
            }
            ast::Stmt::Return(r) => {
                let children = r.arg.iter().map(|a| self.expr(a)).collect();
                self.node(NodeKind::Other, None, r.span, children)
            }
            ast::Stmt::Labeled(l) => {
                let children = vec![self.stmt(&l.body)];
                self.node(NodeKind::Other, None, l.span, children)
            }
            ast::Stmt::If(i) => {
                let mut children = vec![self.expr(&i.test), self.stmt(&i.cons)];
                if let Some(alt) = &i.alt {
                    children.push(self.stmt(alt));
                }
                self.node(NodeKind::Other, None, i.span, children)
            }
            ast::Stmt::Switch(s) => {
                let mut children = vec![self.expr(&s.discriminant)];
                for case in &s.cases {
                    let mut case_children = Vec::new();
                    if let Some(test) = &case.test {
                        case_children.push(self.expr(test));
                    }
                    case_children.extend(case.cons.iter().map(|c| self.stmt(c)));
                    children.push(self.node(NodeKind::Other, None, case.span, case_children));
                }
                self.node(NodeKind::Other, None, s.span, children)
            }
            ast::Stmt::Throw(t) => {
                let children = vec![self.expr(&t.arg)];
                self.node(NodeKind::Other, None, t.span, children)
            }
            ast::Stmt::Try(t) => {
                let mut children = vec![self.block(&t.block)];
                if let Some(handler) = &t.handler {
                    let body = self.block(&handler.body);
                    children.push(self.node(NodeKind::Other, None, handler.span, vec![body]));
                }
                if let Some(finalizer) = &t.finalizer {
                    children.push(self.block(finalizer));
                }
                self.node(NodeKind::Other, None, t.span, children)
            }
            ast::Stmt::While(w) => {
                let children = vec![self.expr(&w.test), self.stmt(&w.body)];
                self.node(NodeKind::Other, None, w.span, children)
            }
            ast::Stmt::DoWhile(w) => {
                let children = vec![self.stmt(&w.body), self.expr(&w.test)];
                self.node(NodeKind::Other, None, w.span, children)
            }
            ast::Stmt::For(f) => {
                let mut children = Vec::new();
                match &f.init {
                    Some(ast::VarDeclOrExpr::VarDecl(v)) => children.push(self.var_decl(v)),
                    Some(ast::VarDeclOrExpr::Expr(e)) => children.push(self.expr(e)),
                    None => {}
                }
                if let Some(test) = &f.test {
                    children.push(self.expr(test));
                }
                if let Some(update) = &f.update {
                    children.push(self.expr(update));
                }
                children.push(self.stmt(&f.body));
                self.node(NodeKind::Other, None, f.span, children)
            }
            ast::Stmt::ForIn(f) => {
                let children = vec![
                    self.for_head(&f.left),
                    self.expr(&f.right),
                    self.stmt(&f.body),
                ];
                self.node(NodeKind::Other, None, f.span, children)
            }
            ast::Stmt::ForOf(f) => {
                let children = vec![
                    self.for_head(&f.left),
                    self.expr(&f.right),
                    self.stmt(&f.body),
                ];
                self.node(NodeKind::Other, None, f.span, children)
            }
            ast::Stmt::Decl(d) => self.decl(d),
            ast::Stmt::Expr(e) => {
                let children = vec![self.expr(&e.expr)];
                self.node(NodeKind::Other, None, e.span, children)
            }
            other => self.opaque(other.span()),
        }
    }

    fn block(&mut self, block: &ast::BlockStmt) -> NodeId {
        let children = block.stmts.iter().map(|s| self.stmt(s)).collect();
        self.node(NodeKind::Other, None, block.span, children)
    }

    fn for_head(&mut self, head: &ast::ForHead) -> NodeId {
        match head {
            ast::ForHead::VarDecl(v) => self.var_decl(v),
            ast::ForHead::Pat(p) => self.pat(p),
            other => self.opaque(other.span()),
        }
    }

    fn decl(&mut self, decl: &ast::Decl) -> NodeId {
        match decl {
            ast::Decl::Fn(f) => {
                let mut children = vec![self.ident(&f.ident)];
                children.extend(self.function_parts(&f.function));
                self.node(NodeKind::Function, None, f.span(), children)
            }
            ast::Decl::Class(c) => self.class_node(Some(&c.ident), &c.class, c.span()),
            ast::Decl::Var(v) => self.var_decl(v),
            other => self.opaque(other.span()),
        }
    }

    fn var_decl(&mut self, var: &ast::VarDecl) -> NodeId {
        let children = var.decls.iter().map(|d| self.declarator(d)).collect();
        self.node(NodeKind::Other, None, var.span, children)
    }

    fn declarator(&mut self, decl: &ast::VarDeclarator) -> NodeId {
        let (kind, name) = match &decl.name {
            ast::Pat::Ident(binding) => (NodeKind::VarDeclarator, self.ident(&binding.id)),
            other => (NodeKind::Other, self.pat(other)),
        };
        let mut children = vec![name];
        if let Some(init) = &decl.init {
            children.push(self.expr(init));
        }
        self.node(kind, None, decl.span, children)
    }

    fn function_parts(&mut self, function: &ast::Function) -> Vec<NodeId> {
        let mut children: Vec<NodeId> = function.params.iter().map(|p| self.pat(&p.pat)).collect();
        if let Some(body) = &function.body {
            children.push(self.block(body));
        }
        children
    }

    fn pat(&mut self, pat: &ast::Pat) -> NodeId {
        match pat {
            ast::Pat::Ident(binding) => self.ident(&binding.id),
            ast::Pat::Assign(a) => {
                let children = vec![self.pat(&a.left), self.expr(&a.right)];
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Pat::Array(a) => {
                let children = a.elems.iter().flatten().map(|p| self.pat(p)).collect();
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Pat::Object(o) => {
                let mut children = Vec::new();
                for prop in &o.props {
                    match prop {
                        ast::ObjectPatProp::KeyValue(kv) => children.push(self.pat(&kv.value)),
                        ast::ObjectPatProp::Assign(a) => {
                            if let Some(value) = &a.value {
                                children.push(self.expr(value));
                            }
                        }
                        ast::ObjectPatProp::Rest(r) => children.push(self.pat(&r.arg)),
                    }
                }
                self.node(NodeKind::Other, None, o.span, children)
            }
            ast::Pat::Rest(r) => {
                let children = vec![self.pat(&r.arg)];
                self.node(NodeKind::Other, None, r.span, children)
            }
            ast::Pat::Expr(e) => self.expr(e),
            ast::Pat::Invalid(i) => self.opaque(i.span),
        }
    }

    // ------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------

    fn expr(&mut self, expr: &ast::Expr) -> NodeId {
        match expr {
            ast::Expr::Lit(ast::Lit::Str(s)) => {
                self.node(
                    NodeKind::Str,
                    Some(s.value.to_atom_lossy().to_string()),
                    s.span,
                    vec![],
                )
            }
            ast::Expr::Lit(other) => self.opaque(other.span()),
            ast::Expr::Ident(i) => self.ident(i),
            ast::Expr::Bin(b) => {
                let kind = if b.op == ast::BinaryOp::Add {
                    NodeKind::Add
                } else {
                    NodeKind::Other
                };
                let children = vec![self.expr(&b.left), self.expr(&b.right)];
                self.node(kind, None, b.span, children)
            }
            ast::Expr::Paren(p) => {
                let children = vec![self.expr(&p.expr)];
                self.node(NodeKind::Other, None, p.span, children)
            }
            ast::Expr::Cond(c) => {
                let children = vec![self.expr(&c.test), self.expr(&c.cons), self.expr(&c.alt)];
                self.node(NodeKind::Other, None, c.span, children)
            }
            ast::Expr::Call(c) => {
                let mut children = Vec::new();
                if let ast::Callee::Expr(callee) = &c.callee {
                    children.push(self.expr(callee));
                }
                children.extend(c.args.iter().map(|a| self.expr(&a.expr)));
                self.node(NodeKind::Other, None, c.span, children)
            }
            ast::Expr::New(n) => {
                let mut children = vec![self.expr(&n.callee)];
                if let Some(args) = &n.args {
                    children.extend(args.iter().map(|a| self.expr(&a.expr)));
                }
                self.node(NodeKind::Other, None, n.span, children)
            }
            ast::Expr::Member(m) => {
                let mut children = vec![self.expr(&m.obj)];
                if let ast::MemberProp::Computed(c) = &m.prop {
                    children.push(self.expr(&c.expr));
                }
                self.node(NodeKind::Other, None, m.span, children)
            }
            ast::Expr::SuperProp(s) => {
                let children = match &s.prop {
                    ast::SuperProp::Computed(c) => vec![self.expr(&c.expr)],
                    ast::SuperProp::Ident(_) => vec![],
                };
                self.node(NodeKind::Other, None, s.span, children)
            }
            ast::Expr::Assign(a) => {
                let children = vec![self.opaque(a.left.span()), self.expr(&a.right)];
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Expr::Unary(u) => {
                let children = vec![self.expr(&u.arg)];
                self.node(NodeKind::Other, None, u.span, children)
            }
            ast::Expr::Update(u) => {
                let children = vec![self.expr(&u.arg)];
                self.node(NodeKind::Other, None, u.span, children)
            }
            ast::Expr::Array(a) => {
                let children = a
                    .elems
                    .iter()
                    .flatten()
                    .map(|e| self.expr(&e.expr))
                    .collect();
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Expr::Object(o) => {
                let mut children = Vec::new();
                for prop in &o.props {
                    match prop {
                        ast::PropOrSpread::Spread(s) => children.push(self.expr(&s.expr)),
                        ast::PropOrSpread::Prop(p) => self.prop(p, &mut children),
                    }
                }
                self.node(NodeKind::Other, None, o.span, children)
            }
            ast::Expr::Seq(s) => {
                let children = s.exprs.iter().map(|e| self.expr(e)).collect();
                self.node(NodeKind::Other, None, s.span, children)
            }
            ast::Expr::Fn(f) => self.fn_expr(f, f.span()),
            ast::Expr::Arrow(a) => {
                let mut children: Vec<NodeId> = a.params.iter().map(|p| self.pat(p)).collect();
                match &*a.body {
                    ast::BlockStmtOrExpr::BlockStmt(b) => children.push(self.block(b)),
                    ast::BlockStmtOrExpr::Expr(e) => children.push(self.expr(e)),
                }
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Expr::Class(c) => self.class_node(c.ident.as_ref(), &c.class, c.span()),
            ast::Expr::Yield(y) => {
                let children = y.arg.iter().map(|a| self.expr(a)).collect();
                self.node(NodeKind::Other, None, y.span, children)
            }
            ast::Expr::Await(a) => {
                let children = vec![self.expr(&a.arg)];
                self.node(NodeKind::Other, None, a.span, children)
            }
            ast::Expr::Tpl(t) => {
                // Template quasis stay verbatim; embedded expressions are
                // still searched for literals.
                let children = t.exprs.iter().map(|e| self.expr(e)).collect();
                self.node(NodeKind::Other, None, t.span, children)
            }
            ast::Expr::TaggedTpl(t) => {
                let mut children = vec![self.expr(&t.tag)];
                children.extend(t.tpl.exprs.iter().map(|e| self.expr(e)));
                self.node(NodeKind::Other, None, t.span, children)
            }
            ast::Expr::OptChain(o) => {
                let children = match &*o.base {
                    ast::OptChainBase::Member(m) => {
                        let mut c = vec![self.expr(&m.obj)];
                        if let ast::MemberProp::Computed(p) = &m.prop {
                            c.push(self.expr(&p.expr));
                        }
                        c
                    }
                    ast::OptChainBase::Call(call) => {
                        let mut c = vec![self.expr(&call.callee)];
                        c.extend(call.args.iter().map(|a| self.expr(&a.expr)));
                        c
                    }
                };
                self.node(NodeKind::Other, None, o.span, children)
            }
            other => self.opaque(other.span()),
        }
    }

    fn prop(&mut self, prop: &ast::Prop, children: &mut Vec<NodeId>) {
        match prop {
            ast::Prop::Shorthand(i) => children.push(self.ident(i)),
            ast::Prop::KeyValue(kv) => {
                if let ast::PropName::Computed(c) = &kv.key {
                    children.push(self.expr(&c.expr));
                }
                children.push(self.expr(&kv.value));
            }
            ast::Prop::Assign(a) => children.push(self.expr(&a.value)),
            ast::Prop::Getter(g) => {
                if let Some(body) = &g.body {
                    children.push(self.block(body));
                }
            }
            ast::Prop::Setter(s) => {
                if let Some(body) = &s.body {
                    children.push(self.block(body));
                }
            }
            ast::Prop::Method(m) => {
                children.extend(self.function_parts(&m.function));
            }
        }
    }

    fn fn_expr(&mut self, f: &ast::FnExpr, span: Span) -> NodeId {
        match &f.ident {
            Some(name) => {
                let mut children = vec![self.ident(name)];
                children.extend(self.function_parts(&f.function));
                self.node(NodeKind::Function, None, span, children)
            }
            None => {
                let children = self.function_parts(&f.function);
                self.node(NodeKind::Other, None, span, children)
            }
        }
    }

    fn class_node(
        &mut self,
        _ident: Option<&ast::Ident>,
        class: &ast::Class,
        span: Span,
    ) -> NodeId {
        let mut children = Vec::new();
        if let Some(super_class) = &class.super_class {
            children.push(self.expr(super_class));
        }
        for member in &class.body {
            let child = match member {
                ast::ClassMember::Constructor(c) => {
                    let mut parts = Vec::new();
                    for param in &c.params {
                        if let ast::ParamOrTsParamProp::Param(p) = param {
                            parts.push(self.pat(&p.pat));
                        }
                    }
                    if let Some(body) = &c.body {
                        parts.push(self.block(body));
                    }
                    self.node(NodeKind::Other, None, c.span, parts)
                }
                ast::ClassMember::Method(m) => {
                    let parts = self.function_parts(&m.function);
                    self.node(NodeKind::Other, None, m.span, parts)
                }
                ast::ClassMember::PrivateMethod(m) => {
                    let parts = self.function_parts(&m.function);
                    self.node(NodeKind::Other, None, m.span, parts)
                }
                ast::ClassMember::ClassProp(p) => {
                    let parts = p.value.iter().map(|v| self.expr(v)).collect();
                    self.node(NodeKind::Other, None, p.span, parts)
                }
                ast::ClassMember::PrivateProp(p) => {
                    let parts = p.value.iter().map(|v| self.expr(v)).collect();
                    self.node(NodeKind::Other, None, p.span, parts)
                }
                ast::ClassMember::StaticBlock(s) => self.block(&s.body),
                other => self.opaque(other.span()),
            };
            children.push(child);
        }
        self.node(NodeKind::Other, None, span, children)
    }
}
